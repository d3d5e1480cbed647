use thiserror::Error;

/// Missing records are not errors: the repository reports them as
/// `Ok(None)` / `Ok(false)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("corrupt data file: {0}")]
    Corrupt(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}
