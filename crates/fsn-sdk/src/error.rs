//! SDK error types

use std::fmt;

use fsn_primitives::Address;
use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Bad construction parameters
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed request shape or types
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Signing is required but no account is set
    #[error("No private key was set for this unsigned transaction")]
    NoSigningKey,

    /// `from` differs from the signing account
    #[error("Sender mismatch: transaction is from {found} but the signing account is {expected}")]
    SenderMismatch {
        /// Address of the signing account
        expected: Address,
        /// Address found in the request
        found: Address,
    },

    /// Transport or remote failure
    #[error("RPC error in {method}: {cause}")]
    Rpc {
        /// RPC method that failed
        method: String,
        /// What went wrong
        cause: RpcCause,
    },

    /// The remote returned nothing for a required lookup
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// A signing key is already installed on this client
    #[error("A signing key is already set for this client")]
    KeyAlreadySet,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SdkError {
    /// JSON-RPC error object returned by the remote
    pub fn rpc_remote(method: &str, code: i64, message: impl Into<String>) -> Self {
        SdkError::Rpc {
            method: method.to_string(),
            cause: RpcCause::Remote {
                code,
                message: message.into(),
            },
        }
    }

    /// Failure below the JSON-RPC layer
    pub fn rpc_transport(method: &str, error: impl fmt::Display) -> Self {
        SdkError::Rpc {
            method: method.to_string(),
            cause: RpcCause::Transport(error.to_string()),
        }
    }

    /// Whether this error was raised locally, before any RPC call
    pub fn is_local(&self) -> bool {
        !matches!(self, SdkError::Rpc { .. } | SdkError::NotFound(_))
    }
}

/// Cause carried by [`SdkError::Rpc`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcCause {
    /// JSON-RPC error object
    Remote {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },
    /// Connection, framing or decoding failure
    Transport(String),
}

impl fmt::Display for RpcCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCause::Remote { code, message } => write!(f, "{} - {}", code, message),
            RpcCause::Transport(message) => write!(f, "transport: {}", message),
        }
    }
}

/// A request field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {kind}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    /// What is wrong with it
    pub kind: ValidationErrorKind,
}

/// Kind of validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    /// Required field is absent
    #[error("missing required field")]
    MissingField,
    /// Field has the wrong JSON type or an out-of-range value
    #[error("expected {expected}")]
    WrongType {
        /// Description of the accepted shape
        expected: &'static str,
    },
    /// Not a valid (checksummed or single-case) 20-byte address
    #[error("malformed address")]
    MalformedAddress,
    /// Not a well-formed hex string of the expected length
    #[error("malformed hex string")]
    MalformedHex,
}

impl ValidationError {
    fn new(field: &str, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }

    /// Required field is absent
    pub fn missing(field: &str) -> Self {
        Self::new(field, ValidationErrorKind::MissingField)
    }

    /// Field has the wrong type
    pub fn wrong_type(field: &str, expected: &'static str) -> Self {
        Self::new(field, ValidationErrorKind::WrongType { expected })
    }

    /// Field is not a valid address
    pub fn malformed_address(field: &str) -> Self {
        Self::new(field, ValidationErrorKind::MalformedAddress)
    }

    /// Field is not valid hex
    pub fn malformed_hex(field: &str) -> Self {
        Self::new(field, ValidationErrorKind::MalformedHex)
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<fsn_crypto::CryptoError> for SdkError {
    fn from(e: fsn_crypto::CryptoError) -> Self {
        SdkError::SigningFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = SdkError::from(ValidationError::missing("asset"));
        assert_eq!(
            err.to_string(),
            "Validation error: field `asset`: missing required field"
        );
        assert!(err.is_local());
    }

    #[test]
    fn test_rpc_error_carries_method() {
        let err = SdkError::rpc_remote("fsn_getBalance", -32000, "unknown block");
        assert_eq!(
            err.to_string(),
            "RPC error in fsn_getBalance: -32000 - unknown block"
        );
        assert!(!err.is_local());
    }
}
