use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::Config;
use db::init_db;
use service::{
    answer::AnswerResolver,
    attendance::AttendanceResolver,
    completion::{CompletionService, OpenAiClient},
};
use store::{MySqlStore, RecordStore};

use crate::docs::ApiDoc;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Front desk is up"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;
    let store: Arc<dyn RecordStore> = Arc::new(MySqlStore::new(pool.clone()));

    let completion: Option<Arc<dyn CompletionService>> = match &config.openai_api_key {
        Some(key) => {
            let client = OpenAiClient::new(
                config.openai_api_url.clone(),
                key.clone(),
                config.openai_model.clone(),
                config.openai_timeout,
            )
            .context("Failed to build OpenAI client")?;
            Some(Arc::new(client))
        }
        None => {
            warn!("OPENAI_API_KEY not set, AI fallback disabled");
            None
        }
    };

    let attendance = Data::new(AttendanceResolver::new(store.clone()));
    let answers = Data::new(AnswerResolver::new(
        store.clone(),
        completion,
        config.classifier_min_score,
    ));
    let store = Data::from(store);

    let answers_for_training = answers.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = answers_for_training.retrain().await {
            error!(error = %e, "Initial classifier training failed");
        }
    });

    let server_addr = config.server_addr.clone();
    let routes_config = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(store.clone())
            .app_data(attendance.clone())
            .app_data(answers.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &routes_config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
