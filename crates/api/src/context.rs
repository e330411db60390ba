//! Application context - wires everything together
//!
//! Grounded on the host codebase's `AppContext` composition-root shape: one
//! struct owns every store and collaborator, constructed once at process
//! start and shared behind `Arc` for the lifetime of the CLI invocation (or
//! the long-running scheduler/reset tasks, in a real deployment).

use std::path::Path;
use std::sync::{Arc, Mutex};

use vigil_bus::TransactionBus;
use vigil_context::CardHistory;
use vigil_control::PauseGate;
use vigil_core::FraudConfig;
use vigil_events::TrainingRowStore;
use vigil_ledger::Ledger;
use vigil_oracle::{
    AnomalyOracle, Clock, GeoResolver, IpReputation, MockAnomalyOracle, MockGeoResolver,
    MockIpReputation, Random, SystemClock, SystemRandom,
};

use crate::error::ApiError;

/// Everything the orchestrator, the scheduler, and the admin surface need.
/// `history` and `training` are `std::sync::Mutex`-guarded rather than
/// `RwLock`: both only ever take exclusive locks (`record`/`append`), so a
/// reader/writer split would buy nothing.
pub struct AppContext {
    pub ledger: Arc<Ledger>,
    pub history: Mutex<CardHistory>,
    pub training: Mutex<TrainingRowStore>,
    pub bus: Arc<TransactionBus>,
    pub pause_gate: Arc<PauseGate>,
    pub config: FraudConfig,
    pub ip_reputation: Arc<dyn IpReputation>,
    pub geo_resolver: Arc<dyn GeoResolver>,
    pub anomaly_oracle: Arc<dyn AnomalyOracle>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn Random>,
}

impl AppContext {
    /// Creates the training-row directory and wires up mock external
    /// collaborators. A real deployment would swap the mocks for live feeds
    /// behind the same traits without touching anything downstream.
    pub async fn new(data_path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let training_path = data_path.as_ref().join("training");
        let training = TrainingRowStore::new(&training_path)?;

        Ok(Self {
            ledger: Arc::new(Ledger::new()),
            history: Mutex::new(CardHistory::new()),
            training: Mutex::new(training),
            bus: Arc::new(TransactionBus::new()),
            pause_gate: Arc::new(PauseGate::new()),
            config: FraudConfig::default(),
            ip_reputation: Arc::new(MockIpReputation::new()),
            geo_resolver: Arc::new(MockGeoResolver::new()),
            anomaly_oracle: Arc::new(MockAnomalyOracle::new()),
            clock: Arc::new(SystemClock),
            random: Arc::new(SystemRandom),
        })
    }
}
