use crate::{
    api::{attendance, employee, faq, visitor},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

/// Per-IP limiter allowing `requests_per_min` with an equal burst
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    // period and burst are both non-zero here, so finish() always yields a config
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let scan_limiter = Arc::new(build_limiter(config.rate_scan_per_min));
    let answer_limiter = Arc::new(build_limiter(config.rate_answer_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/scan must be registered before /{id}
                    .service(
                        web::resource("/scan")
                            .wrap(scan_limiter)
                            .route(web::post().to(attendance::scan)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::scope("/visitors").service(
                    web::resource("")
                        .route(web::get().to(visitor::list_visitors))
                        .route(web::post().to(visitor::log_visitor)),
                ),
            )
            .service(
                web::scope("/faqs")
                    .service(
                        web::resource("/search")
                            .wrap(answer_limiter.clone())
                            .route(web::get().to(faq::search)),
                    )
                    .service(
                        web::resource("/voice")
                            .wrap(answer_limiter)
                            .route(web::post().to(faq::voice)),
                    )
                    .service(web::resource("/retrain").route(web::post().to(faq::retrain)))
                    .service(
                        web::resource("")
                            .route(web::get().to(faq::list_faqs))
                            .route(web::post().to(faq::add_faq)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::{App, HttpResponse, http::StatusCode, test};
    use std::net::SocketAddr;

    #[actix_web::test]
    async fn limiter_rejects_requests_over_burst() {
        let app = test::init_service(
            App::new().service(
                web::resource("/scan")
                    .wrap(build_limiter(2))
                    .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;
        let peer: SocketAddr = "10.0.0.7:4000".parse().unwrap();

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/scan")
                .peer_addr(peer)
                .to_request();
            let status = match test::try_call_service(&app, req).await {
                Ok(resp) => resp.status(),
                Err(e) => e.as_response_error().status_code(),
            };
            statuses.push(status);
        }

        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[actix_web::test]
    async fn limiter_tolerates_extreme_rates() {
        for rate in [0, 100_000] {
            let app = test::init_service(
                App::new().service(
                    web::resource("/scan")
                        .wrap(build_limiter(rate))
                        .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
                ),
            )
            .await;
            let req = test::TestRequest::post()
                .uri("/scan")
                .peer_addr("10.0.0.8:4000".parse().unwrap())
                .to_request();

            assert!(test::try_call_service(&app, req).await.is_ok(), "rate {rate}");
        }
    }
}
