//! Vigil alert review workflow (§4.6's classify operation)
//!
//! ## Scope
//! - Legal status transitions on a `FraudAlert`: `PENDING -> CONFIRMED`,
//!   `PENDING -> FALSE_POSITIVE`
//! - Reimbursement issuance on `FALSE_POSITIVE`, exactly once per alert
//! - No direct table access: storage is reached through the
//!   `AlertRepository`/`ReimbursementIssuer` seam so the transition logic
//!   is testable without a `Ledger`

mod error;
mod repository;
mod workflow;

pub use error::ReviewError;
pub use repository::{AlertRepository, ReimbursementIssuer};
pub use workflow::{FraudStatusResult, ReviewWorkflow};
