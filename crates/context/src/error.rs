use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("card not found: {0}")]
    CardNotFound(vigil_core::CardId),

    #[error("device not found: {0}")]
    DeviceNotFound(vigil_core::DeviceId),
}

pub type ContextResult<T> = Result<T, ContextError>;
