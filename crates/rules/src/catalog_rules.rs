//! The 20 rule evaluators, in catalog declaration order (§4.1, §4.3). This
//! module's item order IS evaluation order — `registry::catalog()` builds
//! its `Vec` by listing these in the same order they appear here.

use chrono::{Duration, Timelike};
use rust_decimal::Decimal;
use vigil_core::{AlertKind, TransactionCandidate};
use vigil_context::ValidationContext;

use crate::geo::haversine_km;
use crate::traits::{FraudRule, RuleInputs};

fn clamped_score(alerts: &[AlertKind]) -> u32 {
    alerts.iter().map(|a| a.weight()).sum::<u32>().min(100)
}

pub struct HighAmount;
impl FraudRule for HighAmount {
    fn kind(&self) -> AlertKind {
        AlertKind::HighAmount
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        if ctx.history.is_empty() {
            return Ok(false);
        }
        let sum: Decimal = ctx.history.iter().map(|tx| tx.amount.value()).sum();
        let avg = sum / Decimal::from(ctx.history.len());
        Ok(avg > Decimal::ZERO && candidate.amount.value() > avg * Decimal::from(3))
    }
}

pub struct LimitExceeded;
impl FraudRule for LimitExceeded {
    fn kind(&self) -> AlertKind {
        AlertKind::LimitExceeded
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(candidate.amount.value() > ctx.card.remaining_limit.value())
    }
}

pub struct CreditLimitReached;
impl FraudRule for CreditLimitReached {
    fn kind(&self) -> AlertKind {
        AlertKind::CreditLimitReached
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let remaining = ctx.card.remaining_limit.value();
        let credit_limit = ctx.card.credit_limit.value();
        let amount = candidate.amount.value();
        if amount == remaining {
            return Ok(true);
        }
        if credit_limit.is_zero() {
            return Ok(false);
        }
        Ok((remaining - amount) / credit_limit < Decimal::new(5, 2))
    }
}

pub struct VelocityAbuse;
impl FraudRule for VelocityAbuse {
    fn kind(&self) -> AlertKind {
        AlertKind::VelocityAbuse
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let cutoff = candidate.timestamp - Duration::seconds(60);
        let count = ctx.history.iter().filter(|tx| tx.timestamp >= cutoff).count();
        Ok(count >= 5)
    }
}

pub struct BurstActivity;
impl FraudRule for BurstActivity {
    fn kind(&self) -> AlertKind {
        AlertKind::BurstActivity
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        if ctx.history.is_empty() {
            return Ok(false);
        }
        let window = Duration::minutes(5);
        let current_count = ctx
            .history
            .iter()
            .filter(|tx| tx.timestamp >= candidate.timestamp - window)
            .count();

        let mut historical_counts: Vec<usize> = ctx
            .history
            .iter()
            .map(|anchor| {
                ctx.history
                    .iter()
                    .filter(|tx| tx.timestamp >= anchor.timestamp - window && tx.timestamp <= anchor.timestamp)
                    .count()
            })
            .collect();
        historical_counts.sort_unstable();
        let median = historical_counts[historical_counts.len() / 2];

        Ok(median > 0 && current_count >= 3 * median)
    }
}

pub struct LocationAnomaly;
impl FraudRule for LocationAnomaly {
    fn kind(&self) -> AlertKind {
        AlertKind::LocationAnomaly
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        if ctx.history.is_empty() {
            return Ok(false);
        }
        let differing = ctx
            .history
            .iter()
            .filter(|tx| tx.country_code != candidate.country_code)
            .count();
        let ratio = differing as f64 / ctx.history.len() as f64;
        Ok(ratio >= 0.8)
    }
}

pub struct ImpossibleTravel;
impl FraudRule for ImpossibleTravel {
    fn kind(&self) -> AlertKind {
        AlertKind::ImpossibleTravel
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let Some(last) = ctx.history.front() else {
            return Ok(false);
        };
        let elapsed_seconds = (candidate.timestamp - last.timestamp).num_seconds();
        if elapsed_seconds <= 0 {
            return Ok(false);
        }
        let distance_km = haversine_km(last.latitude, last.longitude, candidate.latitude, candidate.longitude);
        let speed_kmh = distance_km / (elapsed_seconds as f64 / 3600.0);
        Ok(speed_kmh > 1000.0)
    }
}

pub struct HighRiskCountry;
impl FraudRule for HighRiskCountry {
    fn kind(&self) -> AlertKind {
        AlertKind::HighRiskCountry
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        _ctx: &ValidationContext,
        inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(inputs.high_risk_countries.contains(&candidate.country_code))
    }
}

pub struct NewDeviceDetected;
impl FraudRule for NewDeviceDetected {
    fn kind(&self) -> AlertKind {
        AlertKind::NewDeviceDetected
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(!ctx.device_seen_in_history(&candidate.device_id))
    }
}

pub struct DeviceFingerprintChange;
impl FraudRule for DeviceFingerprintChange {
    fn kind(&self) -> AlertKind {
        AlertKind::DeviceFingerprintChange
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(ctx.device.fingerprint_changed_within(Duration::hours(24), candidate.timestamp))
    }
}

pub struct TorOrProxyDetected;
impl FraudRule for TorOrProxyDetected {
    fn kind(&self) -> AlertKind {
        AlertKind::TorOrProxyDetected
    }
    fn evaluate(
        &self,
        _candidate: &TransactionCandidate,
        _ctx: &ValidationContext,
        inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(inputs.ip_is_blocklisted)
    }
}

pub struct MultipleCardsSameDevice;
impl FraudRule for MultipleCardsSameDevice {
    fn kind(&self) -> AlertKind {
        AlertKind::MultipleCardsSameDevice
    }
    fn evaluate(
        &self,
        _candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        // other_cards_on_device excludes the current card, so >=2 others
        // means >=3 distinct cards total.
        Ok(ctx.other_cards_on_device.len() >= 2)
    }
}

pub struct TimeOfDayAnomaly;
impl FraudRule for TimeOfDayAnomaly {
    fn kind(&self) -> AlertKind {
        AlertKind::TimeOfDayAnomaly
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let hour = candidate.timestamp.hour();
        if !(0..=5).contains(&hour) || ctx.history.is_empty() {
            return Ok(false);
        }
        let in_window = ctx
            .history
            .iter()
            .filter(|tx| (0..=5).contains(&tx.timestamp.hour()))
            .count();
        let ratio = in_window as f64 / ctx.history.len() as f64;
        Ok(ratio < 0.05)
    }
}

pub struct CardTesting;
impl FraudRule for CardTesting {
    fn kind(&self) -> AlertKind {
        AlertKind::CardTesting
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let cutoff = candidate.timestamp - Duration::minutes(10);
        let count = ctx
            .history
            .iter()
            .filter(|tx| tx.timestamp >= cutoff && tx.amount.value() < Decimal::new(500, 2))
            .count();
        Ok(count >= 5)
    }
}

pub struct MicroTransactionPattern;
impl FraudRule for MicroTransactionPattern {
    fn kind(&self) -> AlertKind {
        AlertKind::MicroTransactionPattern
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        if candidate.amount.value() >= Decimal::new(200, 2) {
            return Ok(false);
        }
        let cutoff = candidate.timestamp - Duration::minutes(30);
        let count = ctx
            .history
            .iter()
            .filter(|tx| tx.timestamp >= cutoff && tx.amount.value() < Decimal::new(200, 2))
            .count();
        Ok(count >= 3)
    }
}

pub struct DeclineThenApprovePattern;
impl FraudRule for DeclineThenApprovePattern {
    fn kind(&self) -> AlertKind {
        AlertKind::DeclineThenApprovePattern
    }
    fn evaluate(
        &self,
        _candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        use vigil_core::Decision;
        // newest-first; walk in chronological order (oldest -> newest).
        let chronological: Vec<_> = ctx.history.iter().take(10).rev().collect();
        let non_approved = |d: Decision| d == Decision::Blocked || d == Decision::Review;
        for window in chronological.windows(3) {
            if non_approved(window[0].decision) && non_approved(window[1].decision) && window[2].decision == Decision::Approved {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

pub struct MultipleFailedAttempts;
impl FraudRule for MultipleFailedAttempts {
    fn kind(&self) -> AlertKind {
        AlertKind::MultipleFailedAttempts
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        use vigil_core::Decision;
        let cutoff = candidate.timestamp - Duration::minutes(10);
        let count = ctx
            .history
            .iter()
            .filter(|tx| tx.timestamp >= cutoff && tx.decision != Decision::Approved)
            .count();
        Ok(count >= 3)
    }
}

pub struct SuspiciousSuccessAfterFailure;
impl FraudRule for SuspiciousSuccessAfterFailure {
    fn kind(&self) -> AlertKind {
        AlertKind::SuspiciousSuccessAfterFailure
    }
    fn evaluate(
        &self,
        _candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        use vigil_core::Decision;
        let Some(previous) = ctx.history.front() else {
            return Ok(false);
        };
        if previous.decision != Decision::Blocked {
            return Ok(false);
        }
        // "would otherwise approve": every earlier-in-catalog rule (1..17)
        // left the running score under the REVIEW threshold.
        Ok(clamped_score(alerts_so_far) < 40)
    }
}

pub struct AnomalyModelTriggered;
impl FraudRule for AnomalyModelTriggered {
    fn kind(&self) -> AlertKind {
        AlertKind::AnomalyModelTriggered
    }
    fn evaluate(
        &self,
        _candidate: &TransactionCandidate,
        _ctx: &ValidationContext,
        inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        Ok(inputs.anomaly_model_triggered)
    }
}

pub struct ExpirationDateApproaching;
impl FraudRule for ExpirationDateApproaching {
    fn kind(&self) -> AlertKind {
        AlertKind::ExpirationDateApproaching
    }
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        _inputs: &RuleInputs,
        _alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool> {
        let today = candidate.timestamp.date_naive();
        Ok(ctx.card.days_until_expiration(today) < 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use vigil_core::{CardBrand, CardStatus, Decision, DeviceId, DeviceType, Money, NonNegative};
    use vigil_context::TransactionSnapshot;

    fn base_candidate() -> TransactionCandidate {
        TransactionCandidate {
            id: vigil_core::TransactionId::new(),
            card_id: vigil_core::CardId::new(),
            device_id: DeviceId::new(),
            device_fingerprint_snapshot: "fp".into(),
            merchant_category: "GROCERY".into(),
            amount: Money::new(dec!(10)),
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "US".into(),
            state: "CA".into(),
            city: "SF".into(),
            ip_address: "1.2.3.4".into(),
        }
    }

    fn base_ctx() -> ValidationContext {
        ValidationContext {
            card: vigil_core::Card {
                id: vigil_core::CardId::new(),
                pan: "4111".into(),
                holder_name: "Jane".into(),
                brand: CardBrand::Visa,
                expiration_date: Utc::now().date_naive() + chrono::Duration::days(365),
                credit_limit: NonNegative::new(dec!(1000)).unwrap(),
                remaining_limit: NonNegative::new(dec!(1000)).unwrap(),
                status: CardStatus::Active,
                risk_score: 0,
                created_at: Utc::now(),
                last_transaction_at: None,
                devices: Default::default(),
            },
            device: vigil_core::Device {
                id: DeviceId::new(),
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
    fn limit_exceeded_fires_over_remaining() {
        let mut ctx = base_ctx();
        ctx.card.remaining_limit = NonNegative::new(dec!(5)).unwrap();
        let candidate = base_candidate();
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(LimitExceeded.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn credit_limit_reached_within_5_percent() {
        let mut ctx = base_ctx();
        ctx.card.credit_limit = NonNegative::new(dec!(1000)).unwrap();
        ctx.card.remaining_limit = NonNegative::new(dec!(40)).unwrap();
        let mut candidate = base_candidate();
        candidate.amount = Money::new(dec!(10));
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(CreditLimitReached.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn high_risk_country_checks_set() {
        let ctx = base_ctx();
        let mut candidate = base_candidate();
        candidate.country_code = "RU".into();
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(HighRiskCountry.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn new_device_detected_when_absent_from_history() {
        let ctx = base_ctx();
        let candidate = base_candidate();
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(NewDeviceDetected.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn new_device_not_detected_when_present() {
        let mut ctx = base_ctx();
        let candidate = base_candidate();
        ctx.history.push_front(TransactionSnapshot {
            device_id: candidate.device_id,
            amount: Money::new(dec!(1)),
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "US".into(),
            decision: Decision::Approved,
        });
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(!NewDeviceDetected.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn expiration_date_approaching_within_30_days() {
        let mut ctx = base_ctx();
        let candidate = base_candidate();
        ctx.card.expiration_date = candidate.timestamp.date_naive() + chrono::Duration::days(10);
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(ExpirationDateApproaching.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }

    #[test]
    fn impossible_travel_flags_implausible_speed() {
        let mut ctx = base_ctx();
        let mut candidate = base_candidate();
        candidate.latitude = 40.7128;
        candidate.longitude = -74.0060; // New York
        candidate.timestamp = Utc::now();
        ctx.history.push_front(TransactionSnapshot {
            device_id: candidate.device_id,
            amount: Money::new(dec!(1)),
            timestamp: candidate.timestamp - chrono::Duration::minutes(5),
            latitude: 35.6762,
            longitude: 139.6503, // Tokyo, 5 minutes earlier
            country_code: "JP".into(),
            decision: Decision::Approved,
        });
        let inputs = RuleInputs::new(candidate.timestamp);
        assert!(ImpossibleTravel.evaluate(&candidate, &ctx, &inputs, &[]).unwrap());
    }
}
