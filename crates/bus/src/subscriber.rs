//! Subscriber trait for the realtime publisher.

use async_trait::async_trait;
use vigil_core::TransactionResponse;

use crate::error::BusError;

/// A subscriber of committed `TransactionResponse`s. Each subscriber must
/// tolerate being skipped on its own failure — a failing subscriber never
/// blocks delivery to the others or rolls back the commit that produced the
/// event (§4.7).
#[async_trait]
pub trait TransactionSubscriber: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, response: &TransactionResponse) -> Result<(), BusError>;
}
