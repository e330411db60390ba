//! Reset / housekeeping (§4.9). The truncation order itself is split across
//! the owning stores (`vigil-events::TrainingRowStore::clear_all`, then
//! `vigil-ledger::Ledger::reset_all`); this module only owns the seam that
//! lets the admin surface and the daily cron trigger "do that, in order"
//! without `vigil-control` depending on either store crate.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Timelike, Utc};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

/// Whatever the composition root wires up as "the full ordered reset"
/// (training rows, then alerts/transactions/links/devices/cards).
#[async_trait]
pub trait Resettable: Send + Sync {
    async fn reset_all(&self) -> anyhow::Result<()>;
}

/// Fires `resettable.reset_all()` once every 24h, timed to midnight UTC
/// (simulator-only behavior per §4.9; a production deployment would gate
/// this by environment).
pub struct DailyReset<R> {
    resettable: R,
}

impl<R: Resettable + 'static> DailyReset<R> {
    pub fn new(resettable: R) -> Self {
        Self { resettable }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                sleep(duration_until_next_midnight_utc()).await;
                info!("running daily reset");
                if let Err(err) = self.resettable.reset_all().await {
                    warn!(error = %err, "daily reset failed");
                }
            }
        })
    }
}

fn duration_until_next_midnight_utc() -> Duration {
    let now = Utc::now();
    let next_midnight = (now + ChronoDuration::days(1))
        .with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let span = next_midnight.signed_duration_since(now).to_std().unwrap_or(Duration::from_secs(86_400));
    span
}
