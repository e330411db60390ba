use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::catalog::AlertKind;
use crate::ids::{AlertId, CardId, TransactionId};
use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Pending,
    Confirmed,
    FalsePositive,
}

/// Exists iff at least one rule fired for a transaction. `status` is the
/// only mutable field, and only via `vigil-review`'s classify operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAlert {
    pub id: AlertId,
    pub transaction_id: TransactionId,
    pub card_id: CardId,
    pub alert_types: Vec<AlertKind>,
    pub severity: Severity,
    pub fraud_probability: u8,
    pub fraud_score: u32,
    pub status: AlertStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FraudAlert {
    /// Comma-joined, declaration-order `alert_types`, matching the format
    /// used by the persisted-state column and structured log fields.
    pub fn alert_types_csv(&self) -> String {
        alert_types_to_csv(&self.alert_types)
    }
}

/// Comma-joins alert kinds in the given order. An empty slice encodes as an
/// empty string (the persisted column stores this as `NULL`).
pub fn alert_types_to_csv(kinds: &[AlertKind]) -> String {
    kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(",")
}

/// Parses the persisted `alert_types` column. Tolerant of `NULL` (`None`)
/// and of an empty string, both of which decode to an empty list.
pub fn alert_types_from_csv(raw: Option<&str>) -> Result<Vec<AlertKind>, strum::ParseError> {
    let Some(raw) = raw else { return Ok(Vec::new()) };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(str::trim).map(|s| s.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_preserves_fire_order() {
        let alert = FraudAlert {
            id: AlertId::new(),
            transaction_id: TransactionId::new(),
            card_id: CardId::new(),
            alert_types: vec![AlertKind::HighAmount, AlertKind::VelocityAbuse],
            severity: Severity::Medium,
            fraud_probability: 55,
            fraud_score: 55,
            status: AlertStatus::Pending,
            description: "test".into(),
            created_at: Utc::now(),
        };
        assert_eq!(alert.alert_types_csv(), "HIGH_AMOUNT,VELOCITY_ABUSE");
    }

    #[test]
    fn csv_parse_is_null_and_empty_tolerant() {
        assert_eq!(alert_types_from_csv(None).unwrap(), Vec::new());
        assert_eq!(alert_types_from_csv(Some("")).unwrap(), Vec::new());
    }

    #[test]
    fn csv_parse_round_trips() {
        let kinds = vec![AlertKind::CardTesting, AlertKind::VelocityAbuse, AlertKind::HighAmount];
        let csv = alert_types_to_csv(&kinds);
        assert_eq!(alert_types_from_csv(Some(&csv)).unwrap(), kinds);
    }
}
