//! Error types for the circuit breaker.

use thiserror::Error;

/// Machine-parseable reason codes attached to every [`CircuitError`].
pub mod reason_codes {
    // Decision denials (C_*)
    pub const C_NOT_PERMITTED: &str = "C_NOT_PERMITTED";
    pub const C_UNSUPPORTED_MSG: &str = "C_UNSUPPORTED_MSG";
    pub const C_UNAUTHORIZED: &str = "C_UNAUTHORIZED";

    // Input validation (V_*)
    pub const V_INVALID_ADDRESS: &str = "V_INVALID_ADDRESS";
    pub const V_INVALID_RECORD: &str = "V_INVALID_RECORD";
    pub const V_INVALID_GENESIS: &str = "V_INVALID_GENESIS";
    pub const V_INVALID_CONFIG: &str = "V_INVALID_CONFIG";

    // Store/system errors (S_*)
    pub const S_DB_ERROR: &str = "S_DB_ERROR";
    pub const S_CODEC_ERROR: &str = "S_CODEC_ERROR";
    pub const S_INTERNAL_ERROR: &str = "S_INTERNAL_ERROR";
}

/// Storage collaborator errors. "Not found" is never an error; lookups return `Option`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Codec error for key {key}: {message}")]
    Codec { key: String, message: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Address string/byte conversion errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("address '{address}' does not carry the expected prefix '{expected}'")]
    PrefixMismatch { expected: String, address: String },

    #[error("invalid address encoding: {0}")]
    InvalidHex(String),

    #[error("invalid address length: {0} bytes")]
    InvalidLength(usize),
}

/// Combined circuit breaker error.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// The message exposes neither a legacy signer list nor a credential.
    #[error("message {type_url} has no signer")]
    UnsupportedMessage { type_url: String },

    /// The message type is tripped and no signer is exempt.
    #[error("tx type not allowed: {type_url}")]
    NotPermitted { type_url: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("account {address} may not administer {type_url}")]
    Unauthorized { address: String, type_url: String },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CircuitError {
    /// Stable reason code for logs and CLI output.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::UnsupportedMessage { .. } => reason_codes::C_UNSUPPORTED_MSG,
            Self::NotPermitted { .. } => reason_codes::C_NOT_PERMITTED,
            Self::Unauthorized { .. } => reason_codes::C_UNAUTHORIZED,
            Self::Store(StoreError::Codec { .. }) => reason_codes::S_CODEC_ERROR,
            Self::Store(StoreError::Poisoned) => reason_codes::S_INTERNAL_ERROR,
            Self::Store(StoreError::Database(_)) => reason_codes::S_DB_ERROR,
            Self::Address(_) => reason_codes::V_INVALID_ADDRESS,
            Self::InvalidRecord(_) => reason_codes::V_INVALID_RECORD,
            Self::InvalidGenesis(_) => reason_codes::V_INVALID_GENESIS,
            Self::Config(_) => reason_codes::V_INVALID_CONFIG,
        }
    }

    /// Whether the error is retryable. Retry is a pipeline policy; nothing here retries.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// True for an explicit deny decision, as opposed to a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NotPermitted { .. })
    }
}

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_distinct_per_kind() {
        let not_permitted = CircuitError::NotPermitted {
            type_url: "/test.Send".into(),
        };
        let unsupported = CircuitError::UnsupportedMessage {
            type_url: "/test.Send".into(),
        };
        let store: CircuitError = StoreError::Database("disk full".into()).into();

        assert_eq!(not_permitted.reason_code(), reason_codes::C_NOT_PERMITTED);
        assert_eq!(unsupported.reason_code(), reason_codes::C_UNSUPPORTED_MSG);
        assert_eq!(store.reason_code(), reason_codes::S_DB_ERROR);
        assert!(not_permitted.is_rejection());
        assert!(!store.is_rejection());
        assert!(!store.is_retryable());
    }

    #[test]
    fn test_store_error_message_is_preserved() {
        let err: CircuitError = StoreError::Database("no such table: kv".into()).into();
        assert_eq!(err.to_string(), "Store error: Database error: no such table: kv");
    }
}
