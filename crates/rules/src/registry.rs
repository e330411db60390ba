//! The fixed rule catalog.
//!
//! Deliberately NOT a priority-sorted registry: catalog order is evaluation
//! order, full stop (§4.3). There is no `register`/`priority` surface here —
//! adding a rule means adding a line to this list, in its catalog position.

use crate::catalog_rules::*;
use crate::traits::FraudRule;

pub fn catalog() -> Vec<Box<dyn FraudRule>> {
    vec![
        Box::new(HighAmount),
        Box::new(LimitExceeded),
        Box::new(VelocityAbuse),
        Box::new(BurstActivity),
        Box::new(LocationAnomaly),
        Box::new(ImpossibleTravel),
        Box::new(HighRiskCountry),
        Box::new(NewDeviceDetected),
        Box::new(DeviceFingerprintChange),
        Box::new(TorOrProxyDetected),
        Box::new(MultipleCardsSameDevice),
        Box::new(TimeOfDayAnomaly),
        Box::new(CardTesting),
        Box::new(MicroTransactionPattern),
        Box::new(DeclineThenApprovePattern),
        Box::new(MultipleFailedAttempts),
        Box::new(SuspiciousSuccessAfterFailure),
        Box::new(AnomalyModelTriggered),
        Box::new(CreditLimitReached),
        Box::new(ExpirationDateApproaching),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_20_rules_in_spec_order() {
        let rules = catalog();
        assert_eq!(rules.len(), 20);
        assert_eq!(rules[0].kind(), vigil_core::AlertKind::HighAmount);
        assert_eq!(rules[19].kind(), vigil_core::AlertKind::ExpirationDateApproaching);
    }

    #[test]
    fn catalog_kinds_are_unique() {
        let rules = catalog();
        let kinds: std::collections::HashSet<String> =
            rules.iter().map(|r| r.kind().to_string()).collect();
        assert_eq!(kinds.len(), rules.len());
    }
}
