use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::Utc;
use derive_more::Display;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{
    model::attendance::ScanAction,
    store::{RecordStore, StoreError},
    utils::key_lock::KeyedLocks,
};

#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "Invalid request, RFID is required")]
    InvalidInput,

    #[display(fmt = "RFID not registered.")]
    UnknownIdentity,

    #[display(fmt = "Storage error: {}", _0)]
    StorageError(StoreError),
}

impl std::error::Error for AttendanceError {}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        AttendanceError::StorageError(e)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::InvalidInput => StatusCode::BAD_REQUEST,
            AttendanceError::UnknownIdentity => StatusCode::NOT_FOUND,
            AttendanceError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // storage details stay in the log
        let message = match self {
            AttendanceError::StorageError(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub employee_id: u64,
    pub action: ScanAction,
}

/// Turns badge scans into check-ins and check-outs.
///
/// Every scan toggles: an open session is closed, otherwise a new one is
/// opened. Elapsed time between scans is not considered.
pub struct AttendanceResolver {
    store: Arc<dyn RecordStore>,
    ledger_locks: KeyedLocks<u64>,
}

impl AttendanceResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            ledger_locks: KeyedLocks::new(),
        }
    }

    #[instrument(name = "record_scan", skip(self, token))]
    pub async fn record_scan(&self, token: &str) -> Result<ScanOutcome, AttendanceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AttendanceError::InvalidInput);
        }

        let employee = match self.store.find_employee_by_token(token).await {
            Ok(Some(employee)) => employee,
            Ok(None) => {
                warn!("Scan for unregistered RFID");
                return Err(AttendanceError::UnknownIdentity);
            }
            Err(e) => {
                error!(error = %e, "Employee lookup failed");
                return Err(e.into());
            }
        };

        // read-decide-write must not interleave with another scan for this employee
        let _guard = self.ledger_locks.lock(employee.id).await;

        let latest = self
            .store
            .find_latest_attendance(employee.id)
            .await
            .inspect_err(|e| error!(error = %e, employee_id = employee.id, "Ledger read failed"))?;

        let now = Utc::now();
        let action = match latest {
            Some(open) if open.is_open() => {
                self.store
                    .update_attendance(open.id, now)
                    .await
                    .inspect_err(|e| {
                        error!(error = %e, employee_id = employee.id, record_id = open.id, "Check-out failed")
                    })?;
                ScanAction::CheckOut
            }
            _ => {
                self.store
                    .insert_attendance(employee.id, now)
                    .await
                    .inspect_err(|e| error!(error = %e, employee_id = employee.id, "Check-in failed"))?;
                ScanAction::CheckIn
            }
        };

        info!(employee_id = employee.id, action = %action, "Attendance logged");

        Ok(ScanOutcome {
            employee_id: employee.id,
            action,
        })
    }
}
