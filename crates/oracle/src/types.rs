//! The external-collaborator interfaces (§6): IP reputation, geo resolution,
//! the anomaly model, and the injected clock/randomness that keep rule
//! evaluation free of wall-clock and RNG calls (§9's "inject a Random and a
//! Clock everywhere a rule reads wall-time or randomness" note).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_context::ValidationContext;
use vigil_core::TransactionCandidate;

use crate::error::OracleError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country_code: String,
    pub state: String,
    pub city: String,
}

/// Consulted by `TOR_OR_PROXY_DETECTED` before rule evaluation, at candidate
/// build time (§5: rule evaluation itself must not do I/O).
#[async_trait]
pub trait IpReputation: Send + Sync {
    async fn is_anonymizing(&self, ip: &str) -> Result<bool, OracleError>;
}

/// Resolves an IP/lat/lon triple into the `country_code`/`state`/`city`
/// stored on the transaction candidate.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, ip: &str, latitude: f64, longitude: f64) -> Result<GeoLocation, OracleError>;
}

/// Consulted by `ANOMALY_MODEL_TRIGGERED`, a placeholder hook for whatever
/// learning model eventually consumes `fraud_training_tb`.
#[async_trait]
pub trait AnomalyOracle: Send + Sync {
    async fn flag(&self, candidate: &TransactionCandidate, ctx: &ValidationContext) -> Result<bool, OracleError>;
}

/// Wall-clock access, injected so tests can pin `now`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Randomness access, injected so tests can pin jitter.
pub trait Random: Send + Sync {
    fn jitter_ms(&self, min: u64, max: u64) -> u64;
}
