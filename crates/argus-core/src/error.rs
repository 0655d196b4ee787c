use crate::source::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgusError {
    #[error("remote call failed during {op}: {source}")]
    Remote {
        op: &'static str,
        #[source]
        source: RemoteError,
    },

    #[error("maximum number of objects to monitor ({limit}) exceeded, refine search")]
    LimitExceeded { limit: usize, requested: usize },

    #[error("event callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    #[error("invalid page size: {0}")]
    InvalidPageSize(i64),

    #[error("processor already destroyed")]
    Terminated,

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ArgusError {
    /// Wrap a remote failure with the operation it occurred in.
    pub fn remote(op: &'static str, source: RemoteError) -> Self {
        ArgusError::Remote { op, source }
    }
}

pub type Result<T> = std::result::Result<T, ArgusError>;
