//! Errors from the classify operation (§4.6, §7's `IllegalStatusTransition`
//! / `AlertNotFound` error classes).

use thiserror::Error;
use vigil_core::{AlertId, AlertStatus};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("alert not found: {0}")]
    AlertNotFound(AlertId),

    #[error("illegal status transition for alert {alert}: {from} -> {to}")]
    IllegalStatusTransition { alert: AlertId, from: AlertStatus, to: AlertStatus },

    #[error("ledger error: {0}")]
    Ledger(#[from] vigil_ledger::LedgerError),
}
