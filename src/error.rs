//! Firestore error types
//!
//! Errors raised by query construction and errors delivered to snapshot
//! listeners share one type so that callbacks only ever see
//! `Result<T, FirestoreError>`.
//!
//! # Design
//! Uses thiserror for ergonomic error definitions. Query builder failures are
//! always `InvalidArgument` and are returned synchronously. Errors produced by
//! the sync client are forwarded to listeners untouched. `Unavailable` is
//! synthesized when a server-only read was answered from the cache.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type FirestoreResult<T> = Result<T, FirestoreError>;

/// Firestore errors
///
/// Maps Firestore status codes to Rust enum variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FirestoreError {
    /// Operation was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid argument, typically an inconsistent query
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Deadline exceeded
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Document not found
    #[error("Document not found")]
    NotFound,

    /// Resource already exists
    #[error("Resource already exists")]
    AlreadyExists,

    /// Permission denied
    #[error("Permission denied")]
    PermissionDenied,

    /// Resource exhausted (e.g., quota exceeded)
    #[error("Resource exhausted")]
    ResourceExhausted,

    /// The system is not in a state required for the operation
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// Operation was aborted
    #[error("Operation aborted")]
    Aborted,

    /// Out of range error
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Unimplemented feature
    #[error("Feature not implemented")]
    Unimplemented,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable, or server data required but only cached data available
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Data loss or corruption
    #[error("Data loss")]
    DataLoss,

    /// Unauthenticated
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Unknown error with code
    #[error("Unknown Firestore error: code {0}")]
    Unknown(i32),
}

impl FirestoreError {
    /// Create an invalid-argument error from a message
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an unavailable error from a message
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an internal error from a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create from a gRPC status code and message.
    ///
    /// Sync clients use this to hand transport failures to listeners.
    pub fn from_grpc_code(code: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            1 => Self::Cancelled,
            2 => Self::Unknown(code),
            3 => Self::InvalidArgument(message),
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition(message),
            10 => Self::Aborted,
            11 => Self::OutOfRange(message),
            12 => Self::Unimplemented,
            13 => Self::Internal(message),
            14 => Self::Unavailable(message),
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => Self::Unknown(code),
        }
    }

    /// Whether this error was raised by query validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Whether this error signals missing server data.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
