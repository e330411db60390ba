use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::catalog::AlertKind;
use crate::decision::Decision;
use crate::ids::{TrainingRowId, TransactionId};

/// Append-only. One row per committed transaction, carrying a one-hot
/// encoding of every alert kind for downstream model training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub id: TrainingRowId,
    pub transaction_id: TransactionId,
    pub alert_count: u32,
    pub risk_score: u32,
    pub max_alert_score: u32,
    pub one_hot: BTreeMap<AlertKind, bool>,
    pub final_decision: Decision,
    pub created_at: DateTime<Utc>,
}

impl TrainingRow {
    pub fn build(
        transaction_id: TransactionId,
        fired: &[AlertKind],
        risk_score: u32,
        final_decision: Decision,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut one_hot: BTreeMap<AlertKind, bool> =
            AlertKind::iter().map(|kind| (kind, false)).collect();
        for kind in fired {
            one_hot.insert(*kind, true);
        }
        let max_alert_score = fired.iter().map(|k| k.weight()).max().unwrap_or(0);
        Self {
            id: TrainingRowId::new(),
            transaction_id,
            alert_count: fired.len() as u32,
            risk_score,
            max_alert_score,
            one_hot,
            final_decision,
            created_at,
        }
    }
}

// AlertKind needs Ord/PartialOrd to key a BTreeMap; derive it alongside the
// other trait impls in `catalog.rs` would duplicate the match arm order, so
// derive it here instead via a manual, declaration-order based impl.
impl PartialOrd for AlertKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AlertKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn build_one_hots_every_fired_kind() {
        let row = TrainingRow::build(
            TransactionId::new(),
            &[AlertKind::HighAmount, AlertKind::VelocityAbuse],
            55,
            Decision::Review,
            Utc::now(),
        );
        assert_eq!(row.alert_count, 2);
        assert_eq!(row.max_alert_score, 35);
        assert_eq!(row.one_hot[&AlertKind::HighAmount], true);
        assert_eq!(row.one_hot[&AlertKind::ImpossibleTravel], false);
    }

    #[test]
    fn build_with_no_alerts() {
        let row = TrainingRow::build(TransactionId::new(), &[], 0, Decision::Approved, Utc::now());
        assert_eq!(row.alert_count, 0);
        assert_eq!(row.max_alert_score, 0);
        assert!(row.one_hot.values().all(|fired| !fired));
    }
}
