//! Auto-candidate scheduler (§4.8): ticks every `scheduler_tick_seconds`,
//! skipping the tick entirely when paused, otherwise firing the orchestrator
//! through a bounded pool of `scheduler_workers` so one slow pipeline
//! invocation cannot stall subsequent ticks.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

use crate::pause::PauseGate;
use crate::processor::AutoProcessor;

pub struct Scheduler {
    processor: Arc<dyn AutoProcessor>,
    pause_gate: Arc<PauseGate>,
    tick: Duration,
    permits: Arc<Semaphore>,
}

impl Scheduler {
    pub fn new(
        processor: Arc<dyn AutoProcessor>,
        pause_gate: Arc<PauseGate>,
        tick_seconds: u64,
        workers: usize,
    ) -> Self {
        Self {
            processor,
            pause_gate,
            tick: Duration::from_secs(tick_seconds),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Runs the tick loop on the current task until the returned handle is
    /// aborted. Each tick that isn't skipped is dispatched onto its own
    /// task, bounded by the worker semaphore, so the loop itself never
    /// blocks on a slow pipeline invocation.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.tick);
            loop {
                ticker.tick().await;

                if self.pause_gate.is_paused() {
                    debug!("scheduler tick skipped: paused");
                    continue;
                }

                let permits = self.permits.clone();
                let processor = self.processor.clone();
                tokio::spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return,
                    };
                    if let Err(err) = processor.process_auto().await {
                        warn!(error = %err, "scheduled auto-transaction failed");
                    }
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProcessor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl AutoProcessor for CountingProcessor {
        async fn process_auto(&self) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_tick_when_not_paused() {
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = Arc::new(CountingProcessor { calls: calls.clone() });
        let gate = Arc::new(PauseGate::new());

        let scheduler = Scheduler::new(processor, gate, 1, 5);
        let handle = scheduler.spawn();

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        handle.abort();
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_scheduler_skips_ticks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = Arc::new(CountingProcessor { calls: calls.clone() });
        let gate = Arc::new(PauseGate::new());
        gate.pause();

        let scheduler = Scheduler::new(processor, gate, 1, 5);
        let handle = scheduler.spawn();

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        handle.abort();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
