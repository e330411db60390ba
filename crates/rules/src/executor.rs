//! Runs the catalog against a candidate and context, enforcing the
//! containment policy: a panicking or error-returning rule is logged and
//! treated as non-firing, never taking the rest of the catalog down with it
//! (§4.3, §4.5 failure semantics).

use std::panic::{self, AssertUnwindSafe};

use vigil_core::{AlertKind, TransactionCandidate};
use vigil_context::ValidationContext;

use crate::error::{RulesError, RulesResult};
use crate::registry::catalog;
use crate::traits::{FraudRule, RuleInputs};

/// Step 4 of the orchestrator contract: a non-ACTIVE card short-circuits
/// before any rule runs.
pub fn check_card_active(ctx: &ValidationContext) -> RulesResult<()> {
    if ctx.card.status.is_active() {
        Ok(())
    } else {
        Err(RulesError::CardBlockedOrLost(ctx.card.id))
    }
}

/// Evaluates every rule in catalog order, collecting the alert kinds that
/// fired. Assumes `check_card_active` has already passed.
pub fn evaluate_all(
    candidate: &TransactionCandidate,
    ctx: &ValidationContext,
    inputs: &RuleInputs,
) -> Vec<AlertKind> {
    evaluate_with(&catalog(), candidate, ctx, inputs)
}

pub fn evaluate_with(
    rules: &[Box<dyn FraudRule>],
    candidate: &TransactionCandidate,
    ctx: &ValidationContext,
    inputs: &RuleInputs,
) -> Vec<AlertKind> {
    let mut fired = Vec::new();

    for rule in rules {
        let kind = rule.kind();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            rule.evaluate(candidate, ctx, inputs, &fired)
        }));

        match outcome {
            Ok(Ok(true)) => fired.push(kind),
            Ok(Ok(false)) => {}
            Ok(Err(err)) => {
                tracing::warn!(rule = %kind, error = %err, "rule evaluation returned an error, treating as non-firing");
            }
            Err(_) => {
                tracing::warn!(rule = %kind, "rule evaluation panicked, treating as non-firing");
            }
        }
    }

    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use vigil_core::{CardBrand, CardStatus, DeviceType, Money, NonNegative};

    fn sample_candidate() -> TransactionCandidate {
        TransactionCandidate {
            id: vigil_core::TransactionId::new(),
            card_id: vigil_core::CardId::new(),
            device_id: vigil_core::DeviceId::new(),
            device_fingerprint_snapshot: "fp".into(),
            merchant_category: "GROCERY".into(),
            amount: Money::new(dec!(5000)),
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "RU".into(),
            state: "".into(),
            city: "".into(),
            ip_address: "1.2.3.4".into(),
        }
    }

    fn sample_ctx() -> ValidationContext {
        ValidationContext {
            card: vigil_core::Card {
                id: vigil_core::CardId::new(),
                pan: "4111".into(),
                holder_name: "Jane".into(),
                brand: CardBrand::Visa,
                expiration_date: Utc::now().date_naive() + chrono::Duration::days(365),
                credit_limit: NonNegative::new(dec!(1000)).unwrap(),
                remaining_limit: NonNegative::new(dec!(1000)).unwrap(),
                status: CardStatus::Blocked,
                risk_score: 0,
                created_at: Utc::now(),
                last_transaction_at: None,
                devices: Default::default(),
            },
            device: vigil_core::Device {
                id: vigil_core::DeviceId::new(),
                fingerprint: "fp".into(),
                device_type: DeviceType::Mobile,
                os: "iOS".into(),
                browser: "Safari".into(),
                first_seen_at: Utc::now(),
                last_seen_at: Utc::now(),
                last_fingerprint_changed_at: None,
                cards: Default::default(),
            },
            other_devices_on_card: Default::default(),
            other_cards_on_device: Default::default(),
            history: VecDeque::new(),
        }
    }

    #[test]
    fn blocked_card_short_circuits() {
        let ctx = sample_ctx();
        assert!(matches!(check_card_active(&ctx), Err(RulesError::CardBlockedOrLost(_))));
    }

    #[test]
    fn active_card_passes_precheck() {
        let mut ctx = sample_ctx();
        ctx.card.status = CardStatus::Active;
        assert!(check_card_active(&ctx).is_ok());
    }

    #[test]
    fn high_risk_country_and_limit_exceeded_both_fire() {
        let mut ctx = sample_ctx();
        ctx.card.status = CardStatus::Active;
        ctx.card.remaining_limit = NonNegative::new(dec!(10)).unwrap();
        let candidate = sample_candidate();
        let inputs = RuleInputs::new(candidate.timestamp);

        let fired = evaluate_all(&candidate, &ctx, &inputs);

        assert!(fired.contains(&AlertKind::HighRiskCountry));
        assert!(fired.contains(&AlertKind::LimitExceeded));
    }

    struct PanickingRule;
    impl FraudRule for PanickingRule {
        fn kind(&self) -> AlertKind {
            AlertKind::AnomalyModelTriggered
        }
        fn evaluate(
            &self,
            _candidate: &TransactionCandidate,
            _ctx: &ValidationContext,
            _inputs: &RuleInputs,
            _alerts_so_far: &[AlertKind],
        ) -> anyhow::Result<bool> {
            panic!("boom");
        }
    }

    #[test]
    fn panicking_rule_is_contained_and_treated_as_non_firing() {
        let mut ctx = sample_ctx();
        ctx.card.status = CardStatus::Active;
        let candidate = sample_candidate();
        let inputs = RuleInputs::new(candidate.timestamp);
        let rules: Vec<Box<dyn FraudRule>> = vec![Box::new(PanickingRule)];

        let fired = evaluate_with(&rules, &candidate, &ctx, &inputs);

        assert!(fired.is_empty());
    }
}
