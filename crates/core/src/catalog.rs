//! The rule catalog: a closed, ordered enumeration of alert kinds and their
//! fixed integer weights.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// One of the 20 named risk signals a rule evaluator can raise.
///
/// Declaration order here is also evaluation order (§4.3) — this is not a
/// configurable priority, so do not reorder these variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    HighAmount,
    LimitExceeded,
    VelocityAbuse,
    BurstActivity,
    LocationAnomaly,
    ImpossibleTravel,
    HighRiskCountry,
    NewDeviceDetected,
    DeviceFingerprintChange,
    TorOrProxyDetected,
    MultipleCardsSameDevice,
    TimeOfDayAnomaly,
    CardTesting,
    MicroTransactionPattern,
    DeclineThenApprovePattern,
    MultipleFailedAttempts,
    SuspiciousSuccessAfterFailure,
    AnomalyModelTriggered,
    CreditLimitReached,
    ExpirationDateApproaching,
}

impl AlertKind {
    /// Fixed weight contributed to `total_score` when this alert fires.
    pub const fn weight(&self) -> u32 {
        match self {
            AlertKind::HighAmount => 20,
            AlertKind::LimitExceeded => 40,
            AlertKind::VelocityAbuse => 35,
            AlertKind::BurstActivity => 25,
            AlertKind::LocationAnomaly => 20,
            AlertKind::ImpossibleTravel => 45,
            AlertKind::HighRiskCountry => 40,
            AlertKind::NewDeviceDetected => 15,
            AlertKind::DeviceFingerprintChange => 25,
            AlertKind::TorOrProxyDetected => 35,
            AlertKind::MultipleCardsSameDevice => 50,
            AlertKind::TimeOfDayAnomaly => 10,
            AlertKind::CardTesting => 50,
            AlertKind::MicroTransactionPattern => 35,
            AlertKind::DeclineThenApprovePattern => 30,
            AlertKind::MultipleFailedAttempts => 25,
            AlertKind::SuspiciousSuccessAfterFailure => 35,
            AlertKind::AnomalyModelTriggered => 30,
            AlertKind::CreditLimitReached => 40,
            AlertKind::ExpirationDateApproaching => 25,
        }
    }

    /// Per-alert severity metadata (distinct from the aggregate FraudAlert
    /// severity computed in `vigil-scoring`).
    pub const fn severity(&self) -> crate::severity::Severity {
        use crate::severity::Severity;
        let w = self.weight();
        if w >= 70 {
            Severity::High
        } else if w >= 50 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn weights_match_catalog() {
        assert_eq!(AlertKind::HighAmount.weight(), 20);
        assert_eq!(AlertKind::MultipleCardsSameDevice.weight(), 50);
        assert_eq!(AlertKind::CardTesting.weight(), 50);
        assert_eq!(AlertKind::TimeOfDayAnomaly.weight(), 10);
    }

    #[test]
    fn display_is_screaming_snake_case() {
        assert_eq!(AlertKind::HighRiskCountry.to_string(), "HIGH_RISK_COUNTRY");
        assert_eq!(
            AlertKind::SuspiciousSuccessAfterFailure.to_string(),
            "SUSPICIOUS_SUCCESS_AFTER_FAILURE"
        );
    }

    #[test]
    fn from_str_round_trips() {
        for kind in [AlertKind::VelocityAbuse, AlertKind::ImpossibleTravel] {
            let s = kind.to_string();
            let parsed = AlertKind::from_str(&s).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn serde_round_trips() {
        let kind = AlertKind::CreditLimitReached;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"CREDIT_LIMIT_REACHED\"");
        let parsed: AlertKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, kind);
    }
}
