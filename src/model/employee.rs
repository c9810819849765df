use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Jane Doe",
        "rfid": "04A1B2C3",
        "role": "Engineer",
        "created_at": "2025-02-24T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Jane Doe")]
    pub name: String,

    /// Unique badge scan code
    #[schema(example = "04A1B2C3")]
    pub rfid: String,

    #[schema(example = "Engineer")]
    pub role: String,

    #[schema(
        example = "2025-02-24T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,
}
