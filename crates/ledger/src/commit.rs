//! The Persistence Gateway's one real operation: `commit` (§4.6). Atomic
//! across transaction insert, alert insert-or-skip, training-row insert (the
//! caller's job — `vigil-events` owns that table), and the card-row update,
//! with an optimistic version guard and jittered-backoff retry on conflict.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use vigil_core::{
    AlertId, AlertKind, AlertStatus, Card, Decision, FraudAlert, FraudConfig, NonNegative, Severity,
    Transaction, TransactionCandidate, TransactionId,
};

use crate::error::{LedgerError, LedgerResult};
use crate::store::{CardRow, Ledger};

/// Everything `commit` produced, for the orchestrator to hand to `vigil-events`
/// (training row) and `vigil-bus` (publish) after this call returns.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub transaction: Transaction,
    pub alert: Option<FraudAlert>,
    pub updated_card: Card,
}

fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn moving_average_risk_score(previous: u8, new_score: u32, weight: f64) -> u8 {
    clamp_u8((previous as f64) * (1.0 - weight) + (new_score as f64) * weight)
}

fn describe(fired: &[AlertKind]) -> String {
    if fired.is_empty() {
        "no rules fired".to_string()
    } else {
        format!("{} rule(s) fired: {}", fired.len(), vigil_core::alert_types_to_csv(fired))
    }
}

fn jittered_backoff(config: &FraudConfig, attempt: u32) -> Duration {
    let base = config.optimistic_backoff_min_ms.min(config.optimistic_backoff_max_ms);
    let cap = config.optimistic_backoff_max_ms.max(base);
    let scaled_cap = (base.saturating_add(attempt as u64 * base)).min(cap).max(base);
    let ms = if scaled_cap > base {
        rand::thread_rng().gen_range(base..=scaled_cap)
    } else {
        base
    };
    Duration::from_millis(ms)
}

impl Ledger {
    /// §4.5 step 7 as a single critical section. `expected_card_version`
    /// must be the version observed when the Validation Context was built
    /// (§4.2) — the gap between that read and this write is exactly the
    /// window the optimistic check exists to police.
    #[allow(clippy::too_many_arguments)]
    pub fn commit(
        &self,
        candidate: TransactionCandidate,
        expected_card_version: u64,
        fired: &[AlertKind],
        decision: Decision,
        total_score: u32,
        severity: Severity,
        fraud_probability: u8,
        config: &FraudConfig,
        now: DateTime<Utc>,
    ) -> LedgerResult<CommitOutcome> {
        let max_attempts = config.optimistic_retry_count + 1;
        let mut version_to_try = expected_card_version;

        for attempt in 0..max_attempts {
            match self.try_commit(&candidate, version_to_try, fired, decision, total_score, severity, fraud_probability, config, now) {
                Ok(outcome) => return Ok(outcome),
                Err(LedgerError::Conflict(card_id)) => {
                    if attempt + 1 >= max_attempts {
                        tracing::warn!(card = %card_id, attempts = max_attempts, "commit conflict retries exhausted");
                        return Err(LedgerError::Conflict(card_id));
                    }
                    std::thread::sleep(jittered_backoff(config, attempt));
                    version_to_try = self.card_version(&candidate.card_id)?;
                }
                Err(other) => return Err(other),
            }
        }
        unreachable!("loop always returns within max_attempts iterations")
    }

    #[allow(clippy::too_many_arguments)]
    fn try_commit(
        &self,
        candidate: &TransactionCandidate,
        expected_card_version: u64,
        fired: &[AlertKind],
        decision: Decision,
        total_score: u32,
        severity: Severity,
        fraud_probability: u8,
        config: &FraudConfig,
        now: DateTime<Utc>,
    ) -> LedgerResult<CommitOutcome> {
        let mut cards = self.cards.write().unwrap();
        let mut devices = self.devices.write().unwrap();
        let mut transactions = self.transactions.write().unwrap();
        let mut alerts = self.alerts.write().unwrap();

        let row = cards.get(&candidate.card_id).ok_or(LedgerError::CardNotFound(candidate.card_id))?;
        if row.version != expected_card_version {
            return Err(LedgerError::Conflict(candidate.card_id));
        }

        let mut card = row.card.clone();
        if decision == Decision::Approved {
            card.remaining_limit = card
                .remaining_limit
                .checked_sub(&candidate.amount)
                .ok_or(LedgerError::Conflict(candidate.card_id))?;
        }
        card.risk_score = moving_average_risk_score(card.risk_score, total_score, config.risk_score_ma_weight);
        card.last_transaction_at = Some(now);

        let transaction = candidate.clone().into_transaction(decision, decision.is_fraud(), now);

        let alert = if fired.is_empty() {
            None
        } else {
            Some(FraudAlert {
                id: AlertId::new(),
                transaction_id: transaction.id,
                card_id: transaction.card_id,
                alert_types: fired.to_vec(),
                severity,
                fraud_probability,
                fraud_score: total_score,
                status: AlertStatus::Pending,
                description: describe(fired),
                created_at: now,
            })
        };

        cards.insert(candidate.card_id, CardRow { version: expected_card_version + 1, card: card.clone() });
        transactions.insert(transaction.id, transaction.clone());
        if let Some(ref alert) = alert {
            alerts.insert(alert.id, alert.clone());
        }
        if let Some(device) = devices.get_mut(&candidate.device_id) {
            device.last_seen_at = now;
        }

        Ok(CommitOutcome { transaction, alert, updated_card: card })
    }

    /// Issues a reimbursement twin of an already-committed transaction: a
    /// negative-amount transaction with `is_reimbursement=true`, decision
    /// `APPROVED`, no rule evaluation, and no training row (§4.6, §9 open
    /// question 3).
    ///
    /// `remaining_limit` is only restored if the original transaction was
    /// itself `APPROVED` — `try_commit` only ever deducts the limit for an
    /// approved decision (§8 scenario 2: a `BLOCKED` transaction leaves
    /// `remaining_limit` untouched), so reimbursing a non-approved original
    /// would add back money that was never taken and push `remaining_limit`
    /// above `credit_limit`, breaking the §3 invariant. The restored value
    /// is additionally clamped to `credit_limit` as a floor-level guard.
    pub fn apply_reimbursement(&self, original_transaction_id: TransactionId, now: DateTime<Utc>) -> LedgerResult<Transaction> {
        let original = self.get_transaction(&original_transaction_id)?;

        let mut cards = self.cards.write().unwrap();
        let row = cards.get(&original.card_id).ok_or(LedgerError::CardNotFound(original.card_id))?;
        let mut card = row.card.clone();
        let version = row.version;

        if original.decision == Decision::Approved {
            let restored = card
                .remaining_limit
                .checked_add(&original.amount)
                .ok_or(LedgerError::Conflict(original.card_id))?;
            card.remaining_limit = NonNegative::new(restored.value().min(card.credit_limit.value()))
                .expect("min of two non-negative values is non-negative");
        }

        let reimbursement = Transaction {
            id: TransactionId::new(),
            card_id: original.card_id,
            device_id: original.device_id,
            device_fingerprint_snapshot: original.device_fingerprint_snapshot.clone(),
            merchant_category: original.merchant_category.clone(),
            amount: original.amount.negate(),
            timestamp: now,
            latitude: original.latitude,
            longitude: original.longitude,
            country_code: original.country_code.clone(),
            state: original.state.clone(),
            city: original.city.clone(),
            ip_address: original.ip_address.clone(),
            decision: Decision::Approved,
            is_fraud: false,
            is_reimbursement: true,
            created_at: now,
        };

        cards.insert(original.card_id, CardRow { version: version + 1, card });
        drop(cards);
        self.transactions.write().unwrap().insert(reimbursement.id, reimbursement.clone());

        Ok(reimbursement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use vigil_core::{CardBrand, CardId, CardStatus, DeviceId, DeviceType, Money, NonNegative};

    fn fresh_ledger_with_card() -> (Ledger, CardId, DeviceId) {
        let ledger = Ledger::new();
        let card_id = CardId::new();
        let device_id = DeviceId::new();
        ledger.insert_card(Card {
            id: card_id,
            pan: "4111".into(),
            holder_name: "Jane".into(),
            brand: CardBrand::Visa,
            expiration_date: Utc::now().date_naive(),
            credit_limit: NonNegative::new(dec!(1000)).unwrap(),
            remaining_limit: NonNegative::new(dec!(1000)).unwrap(),
            status: CardStatus::Active,
            risk_score: 0,
            created_at: Utc::now(),
            last_transaction_at: None,
            devices: Default::default(),
        });
        ledger.insert_device(device_stub(device_id));
        (ledger, card_id, device_id)
    }

    fn device_stub(id: DeviceId) -> vigil_core::Device {
        vigil_core::Device {
            id,
            fingerprint: "fp".into(),
            device_type: DeviceType::Mobile,
            os: "iOS".into(),
            browser: "Safari".into(),
            first_seen_at: Utc::now(),
            last_seen_at: Utc::now(),
            last_fingerprint_changed_at: None,
            cards: Default::default(),
        }
    }

    fn candidate(card_id: CardId, device_id: DeviceId, amount: Decimal) -> TransactionCandidate {
        TransactionCandidate {
            id: TransactionId::new(),
            card_id,
            device_id,
            device_fingerprint_snapshot: "fp".into(),
            merchant_category: "GROCERY".into(),
            amount: Money::new(amount),
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "US".into(),
            state: "CA".into(),
            city: "SF".into(),
            ip_address: "1.2.3.4".into(),
        }
    }

    #[test]
    fn happy_path_deducts_remaining_limit_and_writes_no_alert() {
        let (ledger, card_id, device_id) = fresh_ledger_with_card();
        let version = ledger.card_version(&card_id).unwrap();
        let config = FraudConfig::default();

        let outcome = ledger
            .commit(candidate(card_id, device_id, dec!(50)), version, &[], Decision::Approved, 0, Severity::Low, 0, &config, Utc::now())
            .unwrap();

        assert!(outcome.alert.is_none());
        assert_eq!(outcome.updated_card.remaining_limit.value(), dec!(950));
    }

    #[test]
    fn blocked_decision_does_not_deduct_remaining_limit() {
        let (ledger, card_id, device_id) = fresh_ledger_with_card();
        let version = ledger.card_version(&card_id).unwrap();
        let config = FraudConfig::default();

        let outcome = ledger
            .commit(
                candidate(card_id, device_id, dec!(150)),
                version,
                &[AlertKind::LimitExceeded],
                Decision::Blocked,
                40,
                Severity::Medium,
                40,
                &config,
                Utc::now(),
            )
            .unwrap();

        assert!(outcome.alert.is_some());
        assert_eq!(outcome.updated_card.remaining_limit.value(), dec!(1000));
    }

    #[test]
    fn stale_expected_version_conflicts() {
        let (ledger, card_id, device_id) = fresh_ledger_with_card();
        let stale_version = ledger.card_version(&card_id).unwrap();
        let config = FraudConfig { optimistic_retry_count: 0, ..Default::default() };

        // bump the row's real version out from under us
        ledger
            .commit(candidate(card_id, device_id, dec!(10)), stale_version, &[], Decision::Approved, 0, Severity::Low, 0, &config, Utc::now())
            .unwrap();

        let result = ledger.commit(candidate(card_id, device_id, dec!(10)), stale_version, &[], Decision::Approved, 0, Severity::Low, 0, &config, Utc::now());
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }

    #[test]
    fn reimbursement_of_a_blocked_original_leaves_limit_untouched() {
        // The original was BLOCKED, so try_commit never deducted the limit
        // in the first place (§8 scenario 2) — reimbursing it must not add
        // 200 on top of an untouched 1000, which would exceed credit_limit.
        let (ledger, card_id, device_id) = fresh_ledger_with_card();
        let version = ledger.card_version(&card_id).unwrap();
        let config = FraudConfig::default();

        let outcome = ledger
            .commit(
                candidate(card_id, device_id, dec!(200)),
                version,
                &[AlertKind::CardTesting],
                Decision::Blocked,
                50,
                Severity::High,
                50,
                &config,
                Utc::now(),
            )
            .unwrap();

        let reimbursement = ledger.apply_reimbursement(outcome.transaction.id, Utc::now()).unwrap();

        assert!(reimbursement.is_reimbursement);
        assert_eq!(reimbursement.amount.value(), dec!(-200));
        assert_eq!(reimbursement.decision, Decision::Approved);
        assert_eq!(ledger.get_card(&card_id).unwrap().remaining_limit.value(), dec!(1000));
    }

    #[test]
    fn reimbursement_of_an_approved_original_restores_the_deducted_amount() {
        let (ledger, card_id, device_id) = fresh_ledger_with_card();
        let version = ledger.card_version(&card_id).unwrap();
        let config = FraudConfig::default();

        let outcome = ledger
            .commit(candidate(card_id, device_id, dec!(200)), version, &[], Decision::Approved, 0, Severity::Low, 0, &config, Utc::now())
            .unwrap();
        assert_eq!(outcome.updated_card.remaining_limit.value(), dec!(800));

        let reimbursement = ledger.apply_reimbursement(outcome.transaction.id, Utc::now()).unwrap();

        assert!(reimbursement.is_reimbursement);
        assert_eq!(reimbursement.amount.value(), dec!(-200));
        assert_eq!(ledger.get_card(&card_id).unwrap().remaining_limit.value(), dec!(1000));
    }
}
