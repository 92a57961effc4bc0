use crate::error::{CircuitError, CircuitResult};
use crate::tx::{Msg, SignerCapability};

/// Authorizing identities of one message, in declaration order.
///
/// An empty legacy signer list is logged and passed through: the engine treats
/// it as having no bypass exemption.
pub fn resolve_signers(msg: &dyn Msg) -> CircuitResult<Vec<Vec<u8>>> {
    let signers = match msg.signer_capability() {
        SignerCapability::Legacy(signers) => signers,
        SignerCapability::Credential(key) => vec![key.address()],
        SignerCapability::Unsupported => {
            return Err(CircuitError::UnsupportedMessage {
                type_url: msg.type_url().to_string(),
            })
        }
    };

    if signers.is_empty() {
        tracing::error!(msg.url = %msg.type_url(), "recovered no signers");
    }
    Ok(signers)
}
