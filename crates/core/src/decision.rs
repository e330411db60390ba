use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The outcome of scoring a transaction candidate.
///
/// Forms a small lattice `Approved < Review < Blocked`: when more than one
/// computation contributes a candidate decision (a short-circuit path versus
/// the scored path), the most restrictive one always wins, never whichever
/// happened to run last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Review,
    Blocked,
}

impl Decision {
    /// Resolves two independently-derived decisions to the stricter one.
    pub fn most_restrictive(self, other: Decision) -> Decision {
        self.max(other)
    }

    pub fn is_fraud(self) -> bool {
        self == Decision::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_ordering() {
        assert!(Decision::Approved < Decision::Review);
        assert!(Decision::Review < Decision::Blocked);
    }

    #[test]
    fn most_restrictive_picks_stricter() {
        assert_eq!(
            Decision::Blocked.most_restrictive(Decision::Approved),
            Decision::Blocked
        );
        assert_eq!(
            Decision::Approved.most_restrictive(Decision::Review),
            Decision::Review
        );
    }

    #[test]
    fn is_fraud_only_for_blocked() {
        assert!(Decision::Blocked.is_fraud());
        assert!(!Decision::Review.is_fraud());
        assert!(!Decision::Approved.is_fraud());
    }

    #[test]
    fn display_round_trips() {
        use std::str::FromStr;
        assert_eq!(Decision::Review.to_string(), "REVIEW");
        assert_eq!(Decision::from_str("BLOCKED").unwrap(), Decision::Blocked);
    }
}
