//! Account identity encoding.
//!
//! Identities travel as raw bytes inside messages and as human-readable strings
//! in bypass sets, genesis files and the CLI. [`AddressCodec`] converts between
//! the two forms.

use crate::error::AddressError;

/// Default human-readable prefix.
pub const DEFAULT_ADDRESS_PREFIX: &str = "circuit";

/// Accepted raw address lengths (20-byte account ids, 32-byte module/contract ids).
pub const ADDRESS_LENGTHS: [usize; 2] = [20, 32];

/// Bidirectional conversion between an address string and its canonical bytes.
pub trait AddressCodec: Send + Sync {
    fn string_to_bytes(&self, text: &str) -> Result<Vec<u8>, AddressError>;

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError>;

    /// Re-encode an address string into its canonical form.
    fn canonicalize(&self, text: &str) -> Result<String, AddressError> {
        let bytes = self.string_to_bytes(text)?;
        self.bytes_to_string(&bytes)
    }
}

/// `"{prefix}1{lowercase hex}"` addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexAddressCodec {
    prefix: String,
}

impl HexAddressCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn check_length(len: usize) -> Result<(), AddressError> {
        match len {
            0 => Err(AddressError::Empty),
            n if ADDRESS_LENGTHS.contains(&n) => Ok(()),
            n => Err(AddressError::InvalidLength(n)),
        }
    }
}

impl Default for HexAddressCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_PREFIX)
    }
}

impl AddressCodec for HexAddressCodec {
    fn string_to_bytes(&self, text: &str) -> Result<Vec<u8>, AddressError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AddressError::Empty);
        }

        let body = text
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('1'))
            .ok_or_else(|| AddressError::PrefixMismatch {
                expected: self.prefix.clone(),
                address: text.to_string(),
            })?;

        let bytes = hex::decode(body).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::check_length(bytes.len())?;
        Ok(bytes)
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError> {
        Self::check_length(bytes.len())?;
        Ok(format!("{}1{}", self.prefix, hex::encode(bytes)))
    }
}
