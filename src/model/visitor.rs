use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Visitor {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "John Smith")]
    pub name: String,

    pub face_encoding: String,

    #[schema(example = "captures/visitor-1.jpg")]
    pub image_path: String,

    #[schema(example = "2025-02-24T10:15:00Z", value_type = String, format = "date-time")]
    pub first_seen: DateTime<Utc>,
}
