//! The rule catalog and evaluators (C1, C3).
//!
//! `registry::catalog()` builds the fixed, ordered list of 20 rules;
//! `executor::evaluate_all` runs them against a candidate and its
//! [`vigil_context::ValidationContext`], containing any rule that panics or
//! errors instead of letting it take the pipeline down.

pub mod catalog_rules;
pub mod error;
pub mod executor;
pub mod geo;
pub mod registry;
pub mod traits;

pub use error::{RulesError, RulesResult};
pub use executor::{check_card_active, evaluate_all, evaluate_with};
pub use registry::catalog;
pub use traits::{default_high_risk_countries, FraudRule, RuleInputs};
