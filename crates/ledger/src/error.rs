use thiserror::Error;
use vigil_core::{AlertId, CardId, DeviceId, TransactionId};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("alert not found: {0}")]
    AlertNotFound(AlertId),

    #[error("device {device} is not linked to card {card}")]
    DeviceNotLinked { card: CardId, device: DeviceId },

    #[error("optimistic-lock retries exhausted updating card {0}")]
    Conflict(CardId),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
