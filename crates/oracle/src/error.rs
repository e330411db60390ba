//! External-collaborator errors (§6's "Unavailable" error class). The
//! orchestrator maps any of these to "treat the dependent rule as
//! non-firing" rather than failing the whole pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("ip reputation lookup failed for {ip}: {reason}")]
    IpReputationUnavailable { ip: String, reason: String },

    #[error("geo resolution failed for {ip}: {reason}")]
    GeoUnavailable { ip: String, reason: String },

    #[error("anomaly model unavailable: {reason}")]
    AnomalyModelUnavailable { reason: String },
}
