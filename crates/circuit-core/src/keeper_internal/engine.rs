use super::super::{Evaluation, Keeper, Outcome};
use crate::error::CircuitResult;
use crate::store::KvStore;
use std::collections::HashSet;

pub(crate) fn evaluate_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    now: i64,
    type_url: &str,
    signers: &[Vec<u8>],
) -> CircuitResult<Evaluation> {
    let eval = decide(keeper, store, now, type_url, signers)?;
    tracing::debug!(
        msg.url = %type_url,
        allowed = eval.allowed,
        outcome = eval.outcome.as_str(),
        "circuit check"
    );
    Ok(eval)
}

fn decide(
    keeper: &Keeper,
    store: &dyn KvStore,
    now: i64,
    type_url: &str,
    signers: &[Vec<u8>],
) -> CircuitResult<Evaluation> {
    // Default-allow: a type with no trip record is never gated.
    let Some(filtered) = keeper.disable_list.get(store, type_url)? else {
        return Ok(Evaluation::allow(Outcome::NotTripped));
    };

    if signer_bypasses(keeper, &filtered.bypass_set, signers, type_url) {
        return Ok(Evaluation::allow(Outcome::Bypassed));
    }

    if filtered.is_expired_at(now) {
        keeper.disable_list.remove(store, type_url)?;
        tracing::info!(
            msg.url = %type_url,
            expires_at = filtered.expires_at,
            now,
            "tripped circuit expired, record reclaimed"
        );
        return Ok(Evaluation::reclaimed());
    }

    Ok(Evaluation::deny())
}

fn signer_bypasses<'a, I>(
    keeper: &Keeper,
    bypass_set: I,
    signers: &[Vec<u8>],
    type_url: &str,
) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    if signers.is_empty() {
        return false;
    }

    let signer_set: HashSet<&[u8]> = signers.iter().map(Vec::as_slice).collect();
    bypass_set
        .into_iter()
        .any(|bypasser| match keeper.address_codec().string_to_bytes(bypasser) {
            Ok(bytes) => signer_set.contains(bytes.as_slice()),
            Err(e) => {
                // Undecodable entries cannot name any signer.
                tracing::warn!(
                    msg.url = %type_url,
                    bypasser = %bypasser,
                    error = %e,
                    "skipping invalid bypass entry"
                );
                false
            }
        })
}
