//! Transaction and message model consumed by the pipeline.
//!
//! Messages come in two incompatible shapes: legacy messages that declare their
//! signer addresses, and messages that carry a single public-key credential.
//! [`SignerCapability`] makes the shape an explicit variant, with
//! [`SignerCapability::Unsupported`] for messages that have neither.

use crate::address::AddressCodec;
use crate::error::{CircuitError, CircuitResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of an address derived from a public key.
pub const DERIVED_ADDRESS_LEN: usize = 20;

/// Public-key credential embedded in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubKey(Vec<u8>);

impl PubKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Account address: the first 20 bytes of SHA-256 over the key bytes.
    pub fn address(&self) -> Vec<u8> {
        let digest = Sha256::digest(&self.0);
        digest[..DERIVED_ADDRESS_LEN].to_vec()
    }
}

/// How a message exposes its authorizing identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerCapability {
    /// Declared signer addresses in canonical byte form, in declaration order.
    Legacy(Vec<Vec<u8>>),
    /// A single embedded credential.
    Credential(PubKey),
    /// Neither capability.
    Unsupported,
}

pub trait Msg {
    /// Message type identifier, e.g. `/bank.v1.MsgSend`.
    fn type_url(&self) -> &str;

    fn signer_capability(&self) -> SignerCapability;
}

pub trait Tx {
    /// Messages in transaction order.
    fn msgs(&self) -> Vec<&dyn Msg>;
}

/// Concrete message used by hosts without their own message types, the CLI and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    type_url: String,
    signers: SignerCapability,
}

impl Message {
    pub fn legacy(type_url: impl Into<String>, signers: Vec<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            signers: SignerCapability::Legacy(signers),
        }
    }

    pub fn credential(type_url: impl Into<String>, key: PubKey) -> Self {
        Self {
            type_url: type_url.into(),
            signers: SignerCapability::Credential(key),
        }
    }

    pub fn unsigned(type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
            signers: SignerCapability::Unsupported,
        }
    }
}

impl Msg for Message {
    fn type_url(&self) -> &str {
        &self.type_url
    }

    fn signer_capability(&self) -> SignerCapability {
        self.signers.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    pub messages: Vec<Message>,
}

impl Transaction {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl Tx for Transaction {
    fn msgs(&self) -> Vec<&dyn Msg> {
        self.messages.iter().map(|m| m as &dyn Msg).collect()
    }
}

/// Wire form of a message: address strings and a hex public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonMsg {
    #[serde(rename = "@type")]
    pub type_url: String,
    /// Present (even if empty) for legacy messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<String>>,
    /// Hex-encoded public key for credential messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

impl JsonMsg {
    /// Resolve wire fields into a [`Message`]. A signer list wins over a key.
    pub fn decode(&self, codec: &dyn AddressCodec) -> CircuitResult<Message> {
        if let Some(signers) = &self.signers {
            let signers = signers
                .iter()
                .map(|s| codec.string_to_bytes(s))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Message::legacy(&self.type_url, signers));
        }

        if let Some(key) = &self.pub_key {
            let bytes = hex::decode(key).map_err(|e| {
                CircuitError::InvalidRecord(format!("{}: invalid pub_key: {e}", self.type_url))
            })?;
            return Ok(Message::credential(&self.type_url, PubKey::from_bytes(bytes)));
        }

        Ok(Message::unsigned(&self.type_url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonTx {
    #[serde(default)]
    pub messages: Vec<JsonMsg>,
}

impl JsonTx {
    pub fn from_json(text: &str) -> CircuitResult<Self> {
        let invalid =
            |e: serde_json::Error| CircuitError::InvalidRecord(format!("invalid transaction: {e}"));
        let value: serde_json::Value = serde_json::from_str(text).map_err(invalid)?;
        if !value.is_object() {
            return Err(CircuitError::InvalidRecord(
                "invalid transaction: expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(invalid)
    }

    pub fn decode(&self, codec: &dyn AddressCodec) -> CircuitResult<Transaction> {
        let messages = self
            .messages
            .iter()
            .map(|m| m.decode(codec))
            .collect::<CircuitResult<Vec<_>>>()?;
        Ok(Transaction::new(messages))
    }
}
