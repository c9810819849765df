use crate::{
    model::faq::NewFaq,
    service::answer::AnswerResolver,
    store::RecordStore,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Question asked at the desk
    pub query: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct VoiceRequest {
    /// Transcribed voice query
    #[schema(example = "When do you open?")]
    pub query: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/faqs",
    responses(
        (status = 200, description = "All stored FAQs", body = [crate::model::faq::FaqEntry])
    ),
    tag = "FAQ"
)]
pub async fn list_faqs(store: web::Data<dyn RecordStore>) -> actix_web::Result<impl Responder> {
    let faqs = store.list_faqs().await.map_err(|e| {
        error!(error = %e, "Failed to list FAQs");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(faqs))
}

/// Store a predefined answer. The classifier picks it up on the next retrain.
#[utoipa::path(
    post,
    path = "/api/faqs",
    request_body = NewFaq,
    responses(
        (status = 201, description = "FAQ stored", body = crate::model::faq::FaqEntry),
        (status = 400, description = "Question and answer are required", body = Object, example = json!({
            "message": "Question and Answer are required."
        }))
    ),
    tag = "FAQ"
)]
pub async fn add_faq(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<NewFaq>,
) -> actix_web::Result<impl Responder> {
    if payload.question.trim().is_empty() || payload.answer.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Question and Answer are required."
        })));
    }

    let faq = store.insert_faq(&payload).await.map_err(|e| {
        error!(error = %e, "Failed to store FAQ");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(faq))
}

#[utoipa::path(
    get,
    path = "/api/faqs/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Answer with its source", body = crate::service::answer::Answer),
        (status = 400, description = "Query missing"),
        (status = 404, description = "No answer found", body = Object, example = json!({
            "message": "No answer found."
        })),
        (status = 429, description = "Too many requests")
    ),
    tag = "FAQ"
)]
pub async fn search(
    resolver: web::Data<AnswerResolver>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    respond(&resolver, query.query.as_deref(), "Query is required.").await
}

#[utoipa::path(
    post,
    path = "/api/faqs/voice",
    request_body = VoiceRequest,
    responses(
        (status = 200, description = "Answer with its source", body = crate::service::answer::Answer),
        (status = 400, description = "Invalid voice input", body = Object, example = json!({
            "message": "Invalid voice input."
        })),
        (status = 404, description = "No answer found"),
        (status = 429, description = "Too many requests")
    ),
    tag = "FAQ"
)]
pub async fn voice(
    resolver: web::Data<AnswerResolver>,
    payload: web::Json<VoiceRequest>,
) -> impl Responder {
    respond(&resolver, payload.query.as_deref(), "Invalid voice input.").await
}

/// Rebuild the classifier from the stored FAQs
#[utoipa::path(
    post,
    path = "/api/faqs/retrain",
    responses(
        (status = 200, description = "Classifier rebuilt", body = crate::service::answer::TrainingOutcome),
        (status = 500, description = "FAQ store unavailable")
    ),
    tag = "FAQ"
)]
pub async fn retrain(resolver: web::Data<AnswerResolver>) -> actix_web::Result<impl Responder> {
    let outcome = resolver.retrain().await.map_err(|e| {
        error!(error = %e, "Failed to retrain classifier");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(outcome))
}

async fn respond(resolver: &AnswerResolver, query: Option<&str>, invalid: &str) -> HttpResponse {
    let query = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => {
            return HttpResponse::BadRequest().json(json!({ "message": invalid }));
        }
    };

    match resolver.answer(query).await {
        Some(answer) => HttpResponse::Ok().json(answer),
        None => HttpResponse::NotFound().json(json!({ "message": "No answer found." })),
    }
}
