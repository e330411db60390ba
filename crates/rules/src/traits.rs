//! A `FraudRule` is a pure function of a candidate, its validation context,
//! externally-supplied signals, and what has already fired earlier in the
//! catalog. Unlike a general-purpose hook, it performs no I/O and cannot
//! itself time out — the containment policy in `executor` is what lets a
//! misbehaving rule be treated as non-firing instead of taking the pipeline
//! down.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use vigil_core::{AlertKind, TransactionCandidate};
use vigil_context::ValidationContext;

/// Signals that come from outside the pure rule world (IP reputation, the
/// anomaly model, operator-configured thresholds) and must be resolved
/// *before* rule evaluation begins, since rules themselves may not do I/O.
#[derive(Debug, Clone)]
pub struct RuleInputs {
    pub ip_is_blocklisted: bool,
    pub anomaly_model_triggered: bool,
    pub high_risk_countries: HashSet<String>,
    pub now: DateTime<Utc>,
}

impl RuleInputs {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ip_is_blocklisted: false,
            anomaly_model_triggered: false,
            high_risk_countries: default_high_risk_countries(),
            now,
        }
    }
}

pub fn default_high_risk_countries() -> HashSet<String> {
    ["KP", "IR", "SY", "RU", "VE", "AF"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// A single rule evaluator. `kind` identifies which catalog entry this rule
/// contributes if it fires — one rule, one alert kind, by construction.
pub trait FraudRule: Send + Sync {
    fn kind(&self) -> AlertKind;

    /// `alerts_so_far` holds every alert kind that fired earlier in this
    /// same evaluation pass, in catalog order — needed only by rules whose
    /// contract (like SUSPICIOUS_SUCCESS_AFTER_FAILURE) explicitly depends
    /// on what the rest of the pipeline would otherwise have decided.
    fn evaluate(
        &self,
        candidate: &TransactionCandidate,
        ctx: &ValidationContext,
        inputs: &RuleInputs,
        alerts_so_far: &[AlertKind],
    ) -> anyhow::Result<bool>;
}
