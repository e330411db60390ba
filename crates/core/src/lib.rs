//! Domain types shared by every crate in the workspace: money, ids, the
//! rule catalog, and the severity/decision lattice. No I/O, no async.

pub mod alert;
pub mod card;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod device;
pub mod error;
pub mod ids;
pub mod money;
pub mod response;
pub mod severity;
pub mod training;
pub mod transaction;

pub use alert::{alert_types_from_csv, alert_types_to_csv, AlertStatus, FraudAlert};
pub use card::{Card, CardBrand, CardStatus};
pub use catalog::AlertKind;
pub use config::FraudConfig;
pub use decision::Decision;
pub use device::{Device, DeviceType};
pub use ids::{AlertId, CardId, DeviceId, TrainingRowId, TransactionId};
pub use money::{Money, MoneyError, NonNegative};
pub use response::TransactionResponse;
pub use severity::Severity;
pub use training::TrainingRow;
pub use transaction::{Transaction, TransactionCandidate};
