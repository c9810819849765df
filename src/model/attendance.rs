use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2025-02-24T09:00:00Z", value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,

    /// Unset while the session is open
    #[schema(
        example = "2025-02-24T17:30:00Z",
        value_type = Option<String>,
        format = "date-time",
        nullable = true
    )]
    pub check_out_time: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScanAction {
    CheckIn,
    CheckOut,
}
