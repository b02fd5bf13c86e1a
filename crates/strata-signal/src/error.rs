//! Errors raised while building signal types from dictionaries or configuration.
//!
//! Every failure maps onto the platform's shared [`CoreErrorCode`] taxonomy so
//! callers on the other side of the process boundary can branch on the code
//! without parsing messages.

use thiserror::Error;

// ── Codes ───────────────────────────────────────────────────────────

/// Shared error codes understood by every Strata component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreErrorCode {
    /// The caller passed something malformed or unrecognised.
    InvalidArgument,
    /// The request is well-formed but not supported by this build.
    Unsupported,
}

impl std::fmt::Display for CoreErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreErrorCode::InvalidArgument => write!(f, "invalid-argument"),
            CoreErrorCode::Unsupported => write!(f, "unsupported"),
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// `what` names the object being built, e.g. `"signal"` or `"signal report"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("cannot create {what} from empty dictionary")]
    EmptyDictionary { what: &'static str },

    #[error(
        "cannot create {what} from dictionary: invalid variant type received \
         (expected {expected}, found {found})"
    )]
    InvalidType {
        what: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid {what} dictionary, unexpected key '{key}'")]
    UnexpectedKey { what: &'static str, key: String },

    #[error("invalid {what} dictionary, key '{key}' expects {expected}, found {found}")]
    InvalidValue {
        what: &'static str,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid {what} config: {reason}")]
    InvalidConfig { what: &'static str, reason: String },

    #[error("unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: u32 },
}

impl CoreError {
    /// Position of this error in the shared taxonomy.
    pub fn code(&self) -> CoreErrorCode {
        match self {
            CoreError::EmptyDictionary { .. }
            | CoreError::InvalidType { .. }
            | CoreError::UnexpectedKey { .. }
            | CoreError::InvalidValue { .. }
            | CoreError::InvalidConfig { .. } => CoreErrorCode::InvalidArgument,
            CoreError::UnsupportedVersion { .. } => CoreErrorCode::Unsupported,
        }
    }
}
