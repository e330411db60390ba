//! Validation context assembly (C2).
//!
//! A candidate `(card_id, device_id)` is resolved into a read-only
//! [`engine::ValidationContext`]: the card and device records, their
//! linked-entity sets, and the card's last-20 transaction history. Rule
//! evaluators in `vigil-rules` consume the context by reference and never
//! perform their own I/O.

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{CardStore, ContextBuilder, DeviceStore, ValidationContext};
pub use error::{ContextError, ContextResult};
pub use state::{CardHistory, TransactionSnapshot, TransactionWindow, WINDOW_SIZE};
