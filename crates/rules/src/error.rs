use thiserror::Error;
use vigil_core::CardId;

/// Raised by the catalog status pre-check, before any rule runs (§4.3).
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("card {0} is not active, short-circuiting rule evaluation")]
    CardBlockedOrLost(CardId),
}

pub type RulesResult<T> = Result<T, RulesError>;
