//! Vigil external collaborators (§6)
//!
//! The four things the rule catalog and scheduler need that are not pure
//! domain logic: IP reputation, geo resolution, the anomaly model, and the
//! injected clock/randomness. Only mock implementations ship here; a real
//! deployment would swap these for live feeds behind the same traits.

mod error;
mod mock;
mod types;

pub use error::OracleError;
pub use mock::{FixedClock, FixedRandom, MockAnomalyOracle, MockGeoResolver, MockIpReputation, SystemClock, SystemRandom};
pub use types::{AnomalyOracle, Clock, GeoLocation, GeoResolver, IpReputation, Random};
