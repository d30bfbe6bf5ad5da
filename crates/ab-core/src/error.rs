//! # AppError
//!
//! Centralized error handling for the Advert-Board ecosystem.
//! The taxonomy is the contract with callers: causes are distinguished by
//! variant, never by parsing message strings.

use thiserror::Error;

/// The primary error type for all ab-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// No caller identity was supplied with the operation.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The caller is not the advert's owner.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The advert is not currently active (canceled, banned, or expired).
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A guarded state transition matched no row.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// Backend read/write failure, or a state the engine cannot recover from.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for Advert-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
