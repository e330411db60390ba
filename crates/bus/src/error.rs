//! Realtime publisher errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("subscriber '{name}' failed: {reason}")]
    SubscriberFailed { name: String, reason: String },
}
