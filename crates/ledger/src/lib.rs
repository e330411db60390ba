//! Vigil Persistence Gateway (C6)
//!
//! Owns the card, device, transaction, and alert tables and the one
//! operation allowed to mutate them: [`Ledger::commit`]. Card-row updates go
//! through an optimistic version check so two transactions racing on the
//! same card cannot silently clobber each other's limit deduction.
//!
//! # Key Types
//! - `Ledger`: the in-memory store, also the `CardStore`/`DeviceStore`
//!   implementation `vigil-context` builds a validation context from.
//! - `CommitOutcome`: what a successful commit produced.

pub mod commit;
pub mod error;
pub mod store;

pub use commit::CommitOutcome;
pub use error::{LedgerError, LedgerResult};
pub use store::Ledger;
