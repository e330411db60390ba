use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::ids::{CardId, DeviceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Mobile,
    Desktop,
    PosTerminal,
}

/// Many-to-many with `Card`. Lifetime is permanent until an admin reset
/// (C9), never garbage-collected on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub fingerprint: String,
    pub device_type: DeviceType,
    pub os: String,
    pub browser: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub last_fingerprint_changed_at: Option<DateTime<Utc>>,
    pub cards: std::collections::BTreeSet<CardId>,
}

impl Device {
    pub fn fingerprint_changed_within(&self, window: chrono::Duration, now: DateTime<Utc>) -> bool {
        self.last_fingerprint_changed_at
            .is_some_and(|changed_at| now - changed_at <= window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn device_at(last_changed: Option<DateTime<Utc>>) -> Device {
        Device {
            id: DeviceId::new(),
            fingerprint: "fp-1".into(),
            device_type: DeviceType::Mobile,
            os: "iOS".into(),
            browser: "Safari".into(),
            first_seen_at: Utc::now(),
            last_seen_at: Utc::now(),
            last_fingerprint_changed_at: last_changed,
            cards: Default::default(),
        }
    }

    #[test]
    fn fingerprint_change_within_24h_detected() {
        let now = Utc::now();
        let device = device_at(Some(now - Duration::hours(1)));
        assert!(device.fingerprint_changed_within(Duration::hours(24), now));
    }

    #[test]
    fn no_change_recorded_is_false() {
        let now = Utc::now();
        let device = device_at(None);
        assert!(!device.fingerprint_changed_within(Duration::hours(24), now));
    }

    #[test]
    fn change_outside_window_is_false() {
        let now = Utc::now();
        let device = device_at(Some(now - Duration::hours(48)));
        assert!(!device.fingerprint_changed_within(Duration::hours(24), now));
    }
}
