//! Newtype wrappers around `Uuid` so a `CardId` and a `DeviceId` can never be
//! passed to each other's slot by accident.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::from_str(s)?))
            }
        }
    };
}

uuid_id!(CardId);
uuid_id!(DeviceId);
uuid_id!(TransactionId);
uuid_id!(AlertId);
uuid_id!(TrainingRowId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_on_each_new() {
        assert_ne!(CardId::new(), CardId::new());
    }

    #[test]
    fn display_and_from_str_round_trip() {
        let id = CardId::new();
        let s = id.to_string();
        let parsed: CardId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }
}
