//! The one thing the scheduler needs from the orchestrator (§4.8: "invoke
//! the orchestrator (auto mode, successForce=false, no input)"), expressed
//! as a trait so `vigil-control` never depends on `vigil-api`.

use async_trait::async_trait;

#[async_trait]
pub trait AutoProcessor: Send + Sync {
    async fn process_auto(&self) -> anyhow::Result<()>;
}
