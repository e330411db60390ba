//! Vigil Realtime Publisher (C7)
//!
//! Distributes every committed `TransactionResponse` to subscribers,
//! best-effort, with no retained history — a late subscriber only sees
//! transactions committed after it joined.

pub mod channel;
pub mod error;
pub mod subscriber;

pub use channel::TransactionBus;
pub use error::BusError;
pub use subscriber::TransactionSubscriber;
