//! Error types and response codes for bridge operations.

use thiserror::Error;

/// Raw response code returned by the native library.
///
/// Zero is success; everything else is looked up through
/// [`Library::code_description`](crate::Library::code_description) when it is
/// turned into a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rescode(pub i32);

impl Rescode {
    /// The library's success code.
    pub const OK: Rescode = Rescode(0);

    /// Check if this code indicates success.
    pub fn is_ok(&self) -> bool {
        *self == Rescode::OK
    }
}

/// Errors raised anywhere inside the bridge.
///
/// Every variant ends up in a single [`Response`](crate::Response) at the
/// entry-point boundary; only [`BridgeError::Native`] carries a numeric code.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Malformed or missing input field (wrong type, wrong shape, absent).
    #[error("{0}")]
    Input(String),

    /// Input that is well-formed but numerically or symbolically invalid.
    #[error("{0}")]
    Value(String),

    /// Failure reported by the native library.
    #[error("{symbol}: {description}")]
    Native {
        code: i32,
        symbol: String,
        description: String,
    },

    /// Broken internal invariant (double initialization and the like).
    #[error("Internal error: {0}")]
    Internal(String),

    /// The optimizer stopped because cancellation was requested.
    #[error("{0}")]
    Interrupted(String),
}

impl BridgeError {
    pub fn input(msg: impl Into<String>) -> Self {
        BridgeError::Input(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        BridgeError::Value(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        BridgeError::Internal(msg.into())
    }

    /// Numeric code for the response; `None` for interface errors.
    pub fn code(&self) -> Option<i32> {
        match self {
            BridgeError::Native { code, .. } => Some(*code),
            BridgeError::Input(_)
            | BridgeError::Value(_)
            | BridgeError::Internal(_)
            | BridgeError::Interrupted(_) => None,
        }
    }

    /// Check if this error came from a user-requested interruption.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, BridgeError::Interrupted(_))
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
