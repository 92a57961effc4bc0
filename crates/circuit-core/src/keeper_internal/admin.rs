use super::super::Keeper;
use crate::error::{CircuitError, CircuitResult};
use crate::store::KvStore;
use crate::types::{FilteredUrl, Permissions};
use std::collections::BTreeSet;

pub(crate) fn get_permissions_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    address: &[u8],
) -> CircuitResult<Option<Permissions>> {
    Ok(keeper
        .permissions
        .get(store, address)?
        .filter(|perms| !perms.is_none()))
}

pub(crate) fn set_permissions_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    address: &[u8],
    permissions: &Permissions,
) -> CircuitResult<()> {
    keeper.address_codec().bytes_to_string(address)?;
    if permissions.is_none() {
        keeper.remove_permissions(store, address)?;
    } else {
        keeper.permissions.set(store, address, permissions)?;
    }
    Ok(())
}

pub(crate) fn ensure_may_administer_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    caller: &str,
    type_url: &str,
) -> CircuitResult<()> {
    let caller_bytes = keeper.address_codec().string_to_bytes(caller)?;
    if keeper.authority() == Some(caller_bytes.as_slice()) {
        return Ok(());
    }

    let perms = get_permissions_impl(keeper, store, &caller_bytes)?.unwrap_or_default();
    if perms.may_administer(type_url) {
        Ok(())
    } else {
        tracing::warn!(
            caller = %caller,
            msg.url = %type_url,
            level = perms.level.as_str(),
            "caller may not administer message type"
        );
        Err(CircuitError::Unauthorized {
            address: caller.to_string(),
            type_url: type_url.to_string(),
        })
    }
}

fn canonical_bypass<'a, I>(keeper: &Keeper, addresses: I) -> CircuitResult<BTreeSet<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    addresses
        .into_iter()
        .map(|a| keeper.address_codec().canonicalize(a).map_err(CircuitError::from))
        .collect()
}

pub(crate) fn trip_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    type_url: &str,
    record: FilteredUrl,
) -> CircuitResult<()> {
    if type_url.trim().is_empty() {
        return Err(CircuitError::InvalidRecord(
            "message type url must not be empty".to_string(),
        ));
    }
    if record.expires_at < 0 {
        return Err(CircuitError::InvalidRecord(format!(
            "{type_url}: negative expires_at {}",
            record.expires_at
        )));
    }

    let record = FilteredUrl {
        bypass_set: canonical_bypass(keeper, &record.bypass_set)?,
        expires_at: record.expires_at,
    };
    keeper.disable_list.set(store, type_url, &record)?;
    tracing::info!(
        msg.url = %type_url,
        bypass = record.bypass_set.len(),
        expires_at = record.expires_at,
        "circuit tripped"
    );
    Ok(())
}

pub(crate) fn reset_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    type_url: &str,
) -> CircuitResult<bool> {
    if !keeper.disable_list.has(store, type_url)? {
        return Ok(false);
    }
    keeper.disable_list.remove(store, type_url)?;
    tracing::info!(msg.url = %type_url, "circuit reset");
    Ok(true)
}

pub(crate) fn add_bypass_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    type_url: &str,
    addresses: &[String],
) -> CircuitResult<bool> {
    let Some(mut record) = keeper.disable_list.get(store, type_url)? else {
        return Ok(false);
    };

    let added = canonical_bypass(keeper, addresses)?;
    record.bypass_set.extend(added);
    keeper.disable_list.set(store, type_url, &record)?;
    tracing::info!(msg.url = %type_url, bypass = record.bypass_set.len(), "bypass set extended");
    Ok(true)
}

pub(crate) fn disabled_types_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    now: i64,
) -> CircuitResult<Vec<(String, FilteredUrl)>> {
    let mut active = Vec::new();
    let mut expired = Vec::new();
    keeper
        .disable_list
        .walk::<CircuitError, _>(store, |type_url, record| {
            if record.is_expired_at(now) {
                expired.push(type_url);
            } else {
                active.push((type_url, record));
            }
            Ok(false)
        })?;

    for type_url in expired {
        keeper.disable_list.remove(store, &type_url)?;
        tracing::info!(msg.url = %type_url, now, "tripped circuit expired, record reclaimed");
    }

    Ok(active)
}
