use crate::model::visitor::Visitor;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LogVisitor {
    #[schema(example = "John Smith")]
    pub name: String,
    #[serde(default)]
    pub face_encoding: String,
    #[serde(default)]
    #[schema(example = "captures/visitor-1.jpg")]
    pub image_path: String,
}

#[utoipa::path(
    get,
    path = "/api/visitors",
    responses(
        (status = 200, description = "Logged visitors, newest first", body = [Visitor])
    ),
    tag = "Visitor"
)]
pub async fn list_visitors(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let visitors = sqlx::query_as::<_, Visitor>(
        r#"
        SELECT id, name, face_encoding, image_path, first_seen
        FROM visitors
        ORDER BY first_seen DESC, id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch visitors");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(visitors))
}

#[utoipa::path(
    post,
    path = "/api/visitors",
    request_body = LogVisitor,
    responses(
        (status = 201, description = "Visitor logged"),
        (status = 400, description = "Name is required")
    ),
    tag = "Visitor"
)]
pub async fn log_visitor(
    pool: web::Data<MySqlPool>,
    payload: web::Json<LogVisitor>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Name is required"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO visitors (name, face_encoding, image_path)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&payload.face_encoding)
    .bind(&payload.image_path)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to log visitor");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let id = result.last_insert_id();
    info!(visitor_id = id, "Visitor logged");

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}
