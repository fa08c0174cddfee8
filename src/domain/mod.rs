use thiserror::Error;

pub mod timestamp;
pub mod todo;

#[cfg(test)]
pub mod test_util;

/// The categories of failure a caller can branch on. Mirrors the RPC status codes
/// surfaced by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unimplemented,
    InvalidArgument,
    NotFound,
    Unknown,
    Unavailable,
}

impl ErrorKind {
    /// Stable snake_case name for the kind, used as the error code on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unimplemented => "unimplemented",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Unknown => "unknown",
            Self::Unavailable => "unavailable",
        }
    }

    /// Client errors are deterministic and caused by the request itself
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unimplemented | Self::InvalidArgument | Self::NotFound
        )
    }
}

#[derive(Error, Debug)]
pub enum ToDoError {
    #[error(
        "unsupported API version: service implements API version '{supported}', but '{requested}' was requested"
    )]
    UnsupportedApi {
        requested: String,
        supported: &'static str,
    },
    #[error("{field} field has invalid format: {cause}")]
    InvalidField {
        field: &'static str,
        #[source]
        cause: timestamp::TimestampError,
    },
    #[error("ToDo with ID='{0}' is not found")]
    NotFound(i64),
    #[error("failed to connect to database: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("failed to {action}: {cause}")]
    StoreFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl ToDoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedApi { .. } => ErrorKind::Unimplemented,
            Self::InvalidField { .. } => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::StoreUnavailable(_) => ErrorKind::Unavailable,
            Self::StoreFailure { .. } => ErrorKind::Unknown,
        }
    }

    /// Wraps a storage-level failure with a description of the [action] being attempted
    fn store_failure(action: &str, cause: anyhow::Error) -> Self {
        Self::StoreFailure {
            action: action.into(),
            cause,
        }
    }
}
