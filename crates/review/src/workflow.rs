//! Status classification workflow (§4.6's "external-trigger mutation").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{AlertId, AlertStatus, FraudAlert, Transaction};

use crate::error::ReviewError;
use crate::repository::{AlertRepository, ReimbursementIssuer};

/// What `classify` produced: the alert in its new status, plus the
/// reimbursement transaction if this call is the one that issued it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudStatusResult {
    pub alert: FraudAlert,
    pub reimbursement: Option<Transaction>,
}

/// Enforces the legal-transition table and triggers reimbursement, generic
/// over storage so it can be unit-tested without a `Ledger`.
pub struct ReviewWorkflow<'a, R> {
    repo: &'a R,
}

impl<'a, R> ReviewWorkflow<'a, R>
where
    R: AlertRepository + ReimbursementIssuer,
{
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Legal transitions: `PENDING -> CONFIRMED`, `PENDING -> FALSE_POSITIVE`.
    /// A repeat call with `new_status` equal to the alert's current
    /// (non-`PENDING`) status is treated as an idempotent replay: it
    /// succeeds without mutating anything or issuing a second
    /// reimbursement, returning `reimbursement: None` since none was
    /// reissued. Any other transition is `IllegalStatusTransition`.
    pub fn classify(
        &self,
        alert_id: AlertId,
        new_status: AlertStatus,
        now: DateTime<Utc>,
    ) -> Result<FraudStatusResult, ReviewError> {
        let alert = self.repo.get_alert(&alert_id).ok_or(ReviewError::AlertNotFound(alert_id))?;

        if alert.status == new_status && alert.status != AlertStatus::Pending {
            return Ok(FraudStatusResult { alert, reimbursement: None });
        }

        match (alert.status, new_status) {
            (AlertStatus::Pending, AlertStatus::Confirmed) => {
                let updated = self.repo.set_alert_status(&alert_id, AlertStatus::Confirmed)?;
                Ok(FraudStatusResult { alert: updated, reimbursement: None })
            }
            (AlertStatus::Pending, AlertStatus::FalsePositive) => {
                let updated = self.repo.set_alert_status(&alert_id, AlertStatus::FalsePositive)?;
                let reimbursement = self.repo.issue_reimbursement(updated.transaction_id, now)?;
                tracing::info!(alert = %alert_id, transaction = %updated.transaction_id, "issued reimbursement for false-positive alert");
                Ok(FraudStatusResult { alert: updated, reimbursement: Some(reimbursement) })
            }
            (from, to) => Err(ReviewError::IllegalStatusTransition { alert: alert_id, from, to }),
        }
    }

    pub fn get_alert(&self, alert_id: &AlertId) -> Option<FraudAlert> {
        self.repo.get_alert(alert_id)
    }
}
