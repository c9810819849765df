//! Record store used by the resolvers.
//!
//! Plain CRUD handlers talk to the pool directly; the attendance and answer
//! pipelines go through [`RecordStore`] so they can be exercised without a
//! database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::model::{
    attendance::AttendanceRecord,
    employee::Employee,
    faq::{FaqEntry, NewFaq},
};

pub mod mysql;

#[cfg(test)]
pub mod memory;

pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "record {} not found", _0)]
    NotFound(u64),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::NotFound(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Exact match on the scan code.
    async fn find_employee_by_token(&self, token: &str) -> Result<Option<Employee>, StoreError>;

    /// Most recent record by check-in time, newest insert winning ties.
    async fn find_latest_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Opens a new session.
    async fn insert_attendance(
        &self,
        employee_id: u64,
        check_in_time: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Closes the session with the given id.
    async fn update_attendance(
        &self,
        id: u64,
        check_out_time: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Case-insensitive full-string match on the question.
    async fn find_faq_by_question(&self, question: &str) -> Result<Option<FaqEntry>, StoreError>;

    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, StoreError>;

    async fn insert_faq(&self, faq: &NewFaq) -> Result<FaqEntry, StoreError>;
}
