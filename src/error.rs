//! Error types for typed access to erased storage

use thiserror::Error;

use crate::token::TypeToken;

/// Errors that can occur when accessing erased storage
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyError {
    /// Requested type does not match the stored value
    #[error("type mismatch: stored type {stored}, trying to cast to {requested}")]
    TypeMismatch {
        /// Identity of the value currently stored (vacant when empty)
        stored: TypeToken,
        /// Identity the caller asked for
        requested: TypeToken,
    },
}

impl AnyError {
    /// Identity of the stored value at the time of the failed access.
    pub fn stored(&self) -> TypeToken {
        match self {
            Self::TypeMismatch { stored, .. } => *stored,
        }
    }

    /// Identity the failed access asked for.
    pub fn requested(&self) -> TypeToken {
        match self {
            Self::TypeMismatch { requested, .. } => *requested,
        }
    }
}

/// Result type for erased storage operations
pub type AnyResult<T> = Result<T, AnyError>;
