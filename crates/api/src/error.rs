//! The orchestrator's top-level error type (§7): composes every layer's
//! `thiserror` enum via `#[from]` and maps each variant to the status code
//! table a real HTTP framework would use. Oracle failures never reach here —
//! `vigil-oracle` calls are caught and treated as "rule non-firing" at the
//! call site, per §7's `Unavailable` policy.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use vigil_context::ContextError;
use vigil_ledger::LedgerError;
use vigil_review::ReviewError;
use vigil_rules::RulesError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Events(#[from] vigil_events::EventError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no eligible card/device pair is available for an automatic transaction")]
    NoEligibleCandidate,

    #[error("operation timed out")]
    Timeout,
}

/// The JSON error body every boundary error serializes to (§7).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// §6's exit-code/status-mapping table.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Ledger(LedgerError::CardNotFound(_)) => 404,
            ApiError::Ledger(LedgerError::DeviceNotFound(_)) => 404,
            ApiError::Ledger(LedgerError::TransactionNotFound(_)) => 404,
            ApiError::Ledger(LedgerError::AlertNotFound(_)) => 404,
            ApiError::Ledger(LedgerError::DeviceNotLinked { .. }) => 400,
            ApiError::Ledger(LedgerError::Conflict(_)) => 409,
            ApiError::Context(ContextError::CardNotFound(_)) => 404,
            ApiError::Context(ContextError::DeviceNotFound(_)) => 404,
            ApiError::Rules(RulesError::CardBlockedOrLost(_)) => 400,
            ApiError::Review(ReviewError::AlertNotFound(_)) => 404,
            ApiError::Review(ReviewError::IllegalStatusTransition { .. }) => 400,
            ApiError::Review(ReviewError::Ledger(inner)) => ApiError::ledger_status(inner),
            ApiError::Events(_) => 500,
            ApiError::Validation(_) => 400,
            ApiError::NoEligibleCandidate => 400,
            ApiError::Timeout => 504,
        }
    }

    fn ledger_status(inner: &LedgerError) -> u16 {
        match inner {
            LedgerError::CardNotFound(_)
            | LedgerError::DeviceNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::AlertNotFound(_) => 404,
            LedgerError::DeviceNotLinked { .. } => 400,
            LedgerError::Conflict(_) => 409,
        }
    }

    pub fn to_body(&self, now: DateTime<Utc>) -> ErrorBody {
        ErrorBody {
            timestamp: now,
            status: self.status_code(),
            error: format!("{:?}", self).split('(').next().unwrap_or("Internal").to_string(),
            message: self.to_string(),
        }
    }
}
