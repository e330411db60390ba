//! Vigil training-row store (`fraud_training_tb`, §4.9)
//!
//! Append-only JSONL, date-rotated. This is the one table C9's reset
//! clears first, since it has no foreign key back to cards/devices.

pub mod error;
pub mod reader;
pub mod store;

pub use error::EventError;
pub use reader::TrainingRowReader;
pub use store::TrainingRowStore;
