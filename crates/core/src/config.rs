//! `FraudConfig` — everything the spec calls out as configurable rather than
//! hardcoded, mirroring the host stack's `serde(default)`-everywhere config
//! pattern. Defaults reproduce the literal values given in §4 exactly, so an
//! empty config (`FraudConfig::default()`) behaves like the spec's numbers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_high_risk_countries() -> HashSet<String> {
    ["KP", "IR", "SY", "RU", "VE", "AF"].into_iter().map(String::from).collect()
}

const fn default_scheduler_tick_seconds() -> u64 {
    60
}

const fn default_scheduler_workers() -> usize {
    5
}

const fn default_deadline_ms() -> u64 {
    2_000
}

const fn default_optimistic_retry_count() -> u32 {
    3
}

const fn default_backoff_min_ms() -> u64 {
    10
}

const fn default_backoff_max_ms() -> u64 {
    100
}

const fn default_risk_score_ma_weight() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudConfig {
    pub high_risk_countries: HashSet<String>,
    pub scheduler_tick_seconds: u64,
    pub scheduler_workers: usize,
    pub default_deadline_ms: u64,
    pub optimistic_retry_count: u32,
    pub optimistic_backoff_min_ms: u64,
    pub optimistic_backoff_max_ms: u64,
    /// Weight given to the new `total_score` in the card's risk-score moving
    /// average on commit (§4.5 step 7): `risk = risk*(1-w) + score*w`.
    pub risk_score_ma_weight: f64,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            high_risk_countries: default_high_risk_countries(),
            scheduler_tick_seconds: default_scheduler_tick_seconds(),
            scheduler_workers: default_scheduler_workers(),
            default_deadline_ms: default_deadline_ms(),
            optimistic_retry_count: default_optimistic_retry_count(),
            optimistic_backoff_min_ms: default_backoff_min_ms(),
            optimistic_backoff_max_ms: default_backoff_max_ms(),
            risk_score_ma_weight: default_risk_score_ma_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_literals() {
        let cfg = FraudConfig::default();
        assert_eq!(cfg.scheduler_tick_seconds, 60);
        assert_eq!(cfg.scheduler_workers, 5);
        assert_eq!(cfg.optimistic_retry_count, 3);
        assert!(cfg.high_risk_countries.contains("RU"));
        assert_eq!(cfg.risk_score_ma_weight, 0.2);
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let json = r#"{"scheduler_tick_seconds": 30}"#;
        let cfg: FraudConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.scheduler_tick_seconds, 30);
        assert_eq!(cfg.scheduler_workers, 5);
    }
}
