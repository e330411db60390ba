//! In-memory mocks for every external-collaborator trait, used by tests and
//! by the CLI binary when no real feed is configured.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vigil_context::ValidationContext;
use vigil_core::TransactionCandidate;

use crate::error::OracleError;
use crate::types::{AnomalyOracle, Clock, GeoLocation, GeoResolver, IpReputation, Random};

/// Keyed by IP; any IP not present is assumed clean.
#[derive(Default)]
pub struct MockIpReputation {
    blocklisted: RwLock<HashSet<String>>,
}

impl MockIpReputation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_anonymizing(&self, ip: impl Into<String>) {
        self.blocklisted.write().unwrap().insert(ip.into());
    }
}

#[async_trait]
impl IpReputation for MockIpReputation {
    async fn is_anonymizing(&self, ip: &str) -> Result<bool, OracleError> {
        Ok(self.blocklisted.read().unwrap().contains(ip))
    }
}

/// Keyed by IP, with a fallback location for unregistered IPs so callers
/// never have to special-case "unknown".
pub struct MockGeoResolver {
    locations: RwLock<HashMap<String, GeoLocation>>,
    fallback: GeoLocation,
}

impl MockGeoResolver {
    pub fn new() -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            fallback: GeoLocation { country_code: "US".into(), state: "CA".into(), city: "Unknown".into() },
        }
    }

    pub fn register(&self, ip: impl Into<String>, location: GeoLocation) {
        self.locations.write().unwrap().insert(ip.into(), location);
    }
}

impl Default for MockGeoResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoResolver for MockGeoResolver {
    async fn resolve(&self, ip: &str, _latitude: f64, _longitude: f64) -> Result<GeoLocation, OracleError> {
        Ok(self.locations.read().unwrap().get(ip).cloned().unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A single toggle: when armed, every `flag` call returns `true` once, then
/// disarms. Exercises `ANOMALY_MODEL_TRIGGERED` without a real model.
#[derive(Default)]
pub struct MockAnomalyOracle {
    armed: RwLock<bool>,
}

impl MockAnomalyOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) {
        *self.armed.write().unwrap() = true;
    }
}

#[async_trait]
impl AnomalyOracle for MockAnomalyOracle {
    async fn flag(&self, _candidate: &TransactionCandidate, _ctx: &ValidationContext) -> Result<bool, OracleError> {
        let mut armed = self.armed.write().unwrap();
        let was_armed = *armed;
        *armed = false;
        Ok(was_armed)
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pinned clock for deterministic tests.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct SystemRandom;

impl Random for SystemRandom {
    fn jitter_ms(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        rand::Rng::gen_range(&mut rand::thread_rng(), min..=max)
    }
}

/// Always returns `min`, for deterministic tests of retry/backoff paths.
pub struct FixedRandom;

impl Random for FixedRandom {
    fn jitter_ms(&self, min: u64, _max: u64) -> u64 {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vigil_core::{CardId, DeviceId, Money, TransactionId};

    #[tokio::test]
    async fn ip_reputation_flags_only_marked_ips() {
        let oracle = MockIpReputation::new();
        oracle.mark_anonymizing("10.0.0.1");

        assert!(oracle.is_anonymizing("10.0.0.1").await.unwrap());
        assert!(!oracle.is_anonymizing("10.0.0.2").await.unwrap());
    }

    #[tokio::test]
    async fn geo_resolver_falls_back_for_unregistered_ip() {
        let resolver = MockGeoResolver::new();
        let location = resolver.resolve("unknown-ip", 0.0, 0.0).await.unwrap();
        assert_eq!(location.country_code, "US");
    }

    #[tokio::test]
    async fn anomaly_oracle_fires_once_when_armed() {
        let oracle = MockAnomalyOracle::new();
        oracle.arm();

        let candidate = TransactionCandidate {
            id: TransactionId::new(),
            card_id: CardId::new(),
            device_id: DeviceId::new(),
            device_fingerprint_snapshot: "fp".into(),
            merchant_category: "GROCERY".into(),
            amount: Money::ZERO,
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "US".into(),
            state: "CA".into(),
            city: "SF".into(),
            ip_address: "1.2.3.4".into(),
        };
        let ctx = ValidationContext {
            card: test_card(candidate.card_id),
            device: test_device(candidate.device_id),
            other_devices_on_card: Default::default(),
            other_cards_on_device: Default::default(),
            history: Default::default(),
        };

        assert!(oracle.flag(&candidate, &ctx).await.unwrap());
        assert!(!oracle.flag(&candidate, &ctx).await.unwrap());
    }

    #[test]
    fn fixed_clock_always_returns_same_instant() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock(now);
        assert_eq!(clock.now(), now);
    }

    #[test]
    fn fixed_random_returns_the_floor() {
        let random = FixedRandom;
        assert_eq!(random.jitter_ms(10, 100), 10);
    }

    fn test_card(id: CardId) -> vigil_core::Card {
        vigil_core::Card {
            id,
            pan: "4111".into(),
            holder_name: "Jane".into(),
            brand: vigil_core::CardBrand::Visa,
            expiration_date: Utc::now().date_naive(),
            credit_limit: vigil_core::NonNegative::ZERO,
            remaining_limit: vigil_core::NonNegative::ZERO,
            status: vigil_core::CardStatus::Active,
            risk_score: 0,
            created_at: Utc::now(),
            last_transaction_at: None,
            devices: Default::default(),
        }
    }

    fn test_device(id: DeviceId) -> vigil_core::Device {
        vigil_core::Device {
            id,
            fingerprint: "fp".into(),
            device_type: vigil_core::DeviceType::Mobile,
            os: "iOS".into(),
            browser: "Safari".into(),
            first_seen_at: Utc::now(),
            last_seen_at: Utc::now(),
            last_fingerprint_changed_at: None,
            cards: Default::default(),
        }
    }
}
