use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::MySqlPool;
use tracing::debug;

use super::{RecordStore, StoreError};
use crate::model::{
    attendance::AttendanceRecord,
    employee::Employee,
    faq::{FaqEntry, NewFaq},
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn find_employee_by_token(&self, token: &str) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, rfid, role, created_at
            FROM employees
            WHERE rfid = ?
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn find_latest_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, check_in_time, check_out_time
            FROM attendance_logs
            WHERE employee_id = ?
            ORDER BY check_in_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_attendance(
        &self,
        employee_id: u64,
        check_in_time: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_logs (employee_id, check_in_time)
            VALUES (?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(check_in_time)
        .execute(&self.pool)
        .await?;

        Ok(AttendanceRecord {
            id: result.last_insert_id(),
            employee_id,
            check_in_time,
            check_out_time: None,
        })
    }

    async fn update_attendance(
        &self,
        id: u64,
        check_out_time: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_logs
            SET check_out_time = ?
            WHERE id = ?
            "#,
        )
        .bind(check_out_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn find_faq_by_question(&self, question: &str) -> Result<Option<FaqEntry>, StoreError> {
        let faq = sqlx::query_as::<_, FaqEntry>(
            r#"
            SELECT id, question, answer, category
            FROM faqs
            WHERE LOWER(question) = LOWER(?)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(question)
        .fetch_optional(&self.pool)
        .await?;

        Ok(faq)
    }

    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, StoreError> {
        let mut stream = sqlx::query_as::<_, FaqEntry>(
            "SELECT id, question, answer, category FROM faqs ORDER BY id",
        )
        .fetch(&self.pool);

        let mut faqs = Vec::new();
        while let Some(faq) = stream.try_next().await? {
            faqs.push(faq);
        }

        debug!(count = faqs.len(), "Loaded FAQ corpus");
        Ok(faqs)
    }

    async fn insert_faq(&self, faq: &NewFaq) -> Result<FaqEntry, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO faqs (question, answer, category)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&faq.question)
        .bind(&faq.answer)
        .bind(&faq.category)
        .execute(&self.pool)
        .await?;

        Ok(FaqEntry {
            id: result.last_insert_id(),
            question: faq.question.clone(),
            answer: faq.answer.clone(),
            category: faq.category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    const COLLATION_MIGRATION: &str =
        include_str!("../../migrations/20250301090000_exact_match_collation.sql");

    fn column_definition(column: &str) -> Option<&'static str> {
        COLLATION_MIGRATION
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("MODIFY {column} ")))
    }

    // The server default (utf8mb4_0900_ai_ci) would equate `rf-1` with `RF-1`
    // and `cafe` with `café`.
    #[test]
    fn lookup_columns_use_binary_collation() {
        for column in ["rfid", "question"] {
            let definition = column_definition(column)
                .unwrap_or_else(|| panic!("no collation change for {column}"));
            assert!(definition.contains("COLLATE utf8mb4_bin"), "{definition}");
        }
    }
}
