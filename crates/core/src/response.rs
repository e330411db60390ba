//! `TransactionResponse` — the DTO returned to the caller of C5 and fanned
//! out by C7 on every successful commit (§4.7, §6). Lives here rather than in
//! `vigil-api` so `vigil-bus` can publish it without depending on the
//! orchestrator crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::AlertKind;
use crate::decision::Decision;
use crate::ids::{CardId, TransactionId};
use crate::money::Money;
use crate::severity::Severity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub card_id: CardId,
    pub amount: Money,
    pub decision: Decision,
    pub is_fraud: bool,
    pub is_reimbursement: bool,
    pub alert_types: Vec<AlertKind>,
    pub risk_score: u32,
    pub severity: Severity,
    pub fraud_probability: u8,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
