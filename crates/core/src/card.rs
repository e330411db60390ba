use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::ids::{CardId, DeviceId};
use crate::money::NonNegative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Elo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Active,
    Blocked,
    Lost,
}

impl CardStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CardStatus::Active)
    }
}

/// Invariants: `0 <= remaining_limit <= credit_limit`, `risk_score in [0,100]`.
/// Enforced by `Ledger::commit` / card-store mutation paths, not by this
/// struct's constructor alone — a `Card` may be deserialized from storage
/// where the invariant is assumed already to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub pan: String,
    pub holder_name: String,
    pub brand: CardBrand,
    pub expiration_date: NaiveDate,
    pub credit_limit: NonNegative,
    pub remaining_limit: NonNegative,
    pub status: CardStatus,
    pub risk_score: u8,
    pub created_at: DateTime<Utc>,
    pub last_transaction_at: Option<DateTime<Utc>>,
    pub devices: std::collections::BTreeSet<DeviceId>,
}

impl Card {
    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_status_is_active() {
        assert!(CardStatus::Active.is_active());
        assert!(!CardStatus::Blocked.is_active());
        assert!(!CardStatus::Lost.is_active());
    }

    #[test]
    fn brand_display_round_trips() {
        use std::str::FromStr;
        assert_eq!(CardBrand::Mastercard.to_string(), "MASTERCARD");
        assert_eq!(CardBrand::from_str("AMEX").unwrap(), CardBrand::Amex);
    }
}
