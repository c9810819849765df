//! In-memory [`RecordStore`] for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RecordStore, StoreError};
use crate::model::{
    attendance::AttendanceRecord,
    employee::Employee,
    faq::{FaqEntry, NewFaq},
};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    faqs: Vec<FaqEntry>,
}

/// Every call yields to the scheduler first so concurrent callers interleave
/// between reads and writes the way they would against a real database.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&self, name: &str, rfid: &str) -> u64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.employees.len() as u64 + 1;
        tables.employees.push(Employee {
            id,
            name: name.to_string(),
            rfid: rfid.to_string(),
            role: "Staff".to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_faq(&self, question: &str, answer: &str) {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.faqs.len() as u64 + 1;
        tables.faqs.push(FaqEntry {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            category: "General".to_string(),
        });
    }

    pub fn attendance_for(&self, employee_id: u64) -> Vec<AttendanceRecord> {
        self.tables
            .lock()
            .unwrap()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    pub fn faq_count(&self) -> usize {
        self.tables.lock().unwrap().faqs.len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_employee_by_token(&self, token: &str) -> Result<Option<Employee>, StoreError> {
        self.check().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.employees.iter().find(|e| e.rfid == token).cloned())
    }

    async fn find_latest_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.check().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .max_by_key(|r| (r.check_in_time, r.id))
            .cloned())
    }

    async fn insert_attendance(
        &self,
        employee_id: u64,
        check_in_time: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError> {
        self.check().await?;
        let mut tables = self.tables.lock().unwrap();
        let record = AttendanceRecord {
            id: tables.attendance.len() as u64 + 1,
            employee_id,
            check_in_time,
            check_out_time: None,
        };
        tables.attendance.push(record.clone());
        Ok(record)
    }

    async fn update_attendance(
        &self,
        id: u64,
        check_out_time: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check().await?;
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .attendance
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.check_out_time = Some(check_out_time);
        Ok(())
    }

    async fn find_faq_by_question(&self, question: &str) -> Result<Option<FaqEntry>, StoreError> {
        self.check().await?;
        let needle = question.to_lowercase();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .faqs
            .iter()
            .find(|f| f.question.to_lowercase() == needle)
            .cloned())
    }

    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, StoreError> {
        self.check().await?;
        Ok(self.tables.lock().unwrap().faqs.clone())
    }

    async fn insert_faq(&self, faq: &NewFaq) -> Result<FaqEntry, StoreError> {
        self.check().await?;
        let mut tables = self.tables.lock().unwrap();
        let entry = FaqEntry {
            id: tables.faqs.len() as u64 + 1,
            question: faq.question.clone(),
            answer: faq.answer.clone(),
            category: faq.category.clone(),
        };
        tables.faqs.push(entry.clone());
        Ok(entry)
    }
}
