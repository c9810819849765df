use actix_web::error::ErrorBadRequest;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::MySqlPool;

/// Kind of value a column accepts in a partial update
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    Text,
    Timestamp,
    NullableTimestamp,
}

#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    DateTime(DateTime<Utc>),
    U64(u64),
    Null,
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Builds `UPDATE <table> SET .. WHERE <id_column> = ?` from a JSON object.
///
/// Only keys listed in `columns` are accepted; anything else is a client error.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    columns: &[(&str, ColumnKind)],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let mut assignments = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len() + 1);

    for (key, value) in obj {
        let (column, kind) = columns
            .iter()
            .find(|(name, _)| name == key)
            .ok_or_else(|| ErrorBadRequest(format!("Unknown field: {key}")))?;

        let bound = match (kind, value) {
            (ColumnKind::Text, Value::String(s)) => SqlValue::String(s.clone()),
            (ColumnKind::Timestamp | ColumnKind::NullableTimestamp, Value::String(s)) => {
                let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| {
                    ErrorBadRequest(format!("{key} must be an RFC 3339 timestamp"))
                })?;
                SqlValue::DateTime(parsed.with_timezone(&Utc))
            }
            (ColumnKind::NullableTimestamp, Value::Null) => SqlValue::Null,
            _ => return Err(ErrorBadRequest(format!("Invalid value for {key}"))),
        };

        assignments.push(format!("{column} = ?"));
        values.push(bound);
    }

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table,
        assignments.join(", "),
        id_column
    );

    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<DateTime<Utc>>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// MySQL reports unique-key and foreign-key violations as SQLSTATE 23000.
pub fn is_constraint_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

/// Page window for list endpoints. `per_page` is capped at 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub offset: u64,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(20).clamp(1, 100);
        // u32 * u32 always fits in u64
        let offset = u64::from(page - 1) * u64::from(per_page);
        Self {
            page,
            per_page,
            offset,
        }
    }
}
