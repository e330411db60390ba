//! Trait seam between the classify workflow and its storage, mirroring the
//! `CardStore`/`DeviceStore` seam `vigil-context` uses to talk to
//! `vigil-ledger` without depending on it. Here the dependency direction is
//! reversed only in spirit: `vigil-review` does depend on `vigil-ledger`
//! (for the concrete `Ledger` adapter below), but `ReviewWorkflow` itself is
//! generic over these traits so unit tests can exercise the legal-transition
//! logic against an in-memory fake with no `Ledger` in sight.

use chrono::{DateTime, Utc};
use vigil_core::{AlertId, AlertStatus, FraudAlert, Transaction, TransactionId};

use crate::error::ReviewError;

/// Read/write access to the alert table, scoped to what classify needs.
pub trait AlertRepository: Send + Sync {
    fn get_alert(&self, id: &AlertId) -> Option<FraudAlert>;
    fn set_alert_status(&self, id: &AlertId, status: AlertStatus) -> Result<FraudAlert, ReviewError>;
}

/// Issues the negative-amount reimbursement twin (§4.6) for a
/// `FALSE_POSITIVE` classification.
pub trait ReimbursementIssuer: Send + Sync {
    fn issue_reimbursement(
        &self,
        original_transaction_id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<Transaction, ReviewError>;
}

impl AlertRepository for vigil_ledger::Ledger {
    fn get_alert(&self, id: &AlertId) -> Option<FraudAlert> {
        vigil_ledger::Ledger::get_alert(self, id)
    }

    fn set_alert_status(&self, id: &AlertId, status: AlertStatus) -> Result<FraudAlert, ReviewError> {
        Ok(vigil_ledger::Ledger::set_alert_status(self, id, status)?)
    }
}

impl ReimbursementIssuer for vigil_ledger::Ledger {
    fn issue_reimbursement(
        &self,
        original_transaction_id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<Transaction, ReviewError> {
        Ok(self.apply_reimbursement(original_transaction_id, now)?)
    }
}
