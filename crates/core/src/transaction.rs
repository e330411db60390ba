use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::ids::{CardId, DeviceId, TransactionId};
use crate::money::Money;

/// A transaction candidate that has been committed. Immutable after commit;
/// the Persistence Gateway (`vigil-ledger`) is the only writer, and writes
/// exactly once per id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub card_id: CardId,
    pub device_id: DeviceId,
    pub device_fingerprint_snapshot: String,
    pub merchant_category: String,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub state: String,
    pub city: String,
    pub ip_address: String,
    pub decision: Decision,
    pub is_fraud: bool,
    pub is_reimbursement: bool,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to evaluate and commit a transaction, before it has
/// been assigned a decision. Produced by orchestrator step 2 (build
/// candidate), consumed by C2's context assembly and by C3's rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCandidate {
    pub id: TransactionId,
    pub card_id: CardId,
    pub device_id: DeviceId,
    pub device_fingerprint_snapshot: String,
    pub merchant_category: String,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub state: String,
    pub city: String,
    pub ip_address: String,
}

impl TransactionCandidate {
    pub fn into_transaction(self, decision: Decision, is_fraud: bool, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: self.id,
            card_id: self.card_id,
            device_id: self.device_id,
            device_fingerprint_snapshot: self.device_fingerprint_snapshot,
            merchant_category: self.merchant_category,
            amount: self.amount,
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            country_code: self.country_code,
            state: self.state,
            city: self.city,
            ip_address: self.ip_address,
            decision,
            is_fraud,
            is_reimbursement: false,
            created_at,
        }
    }
}
