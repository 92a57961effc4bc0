use super::super::Keeper;
use crate::error::{CircuitError, CircuitResult};
use crate::genesis::{GenesisAccountPermissions, GenesisState};
use crate::store::KvStore;
use std::collections::BTreeMap;

pub(crate) fn export_genesis_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
) -> CircuitResult<GenesisState> {
    let mut account_permissions = Vec::new();
    keeper
        .permissions
        .walk::<CircuitError, _>(store, |address, permissions| {
            let address = keeper.address_codec().bytes_to_string(&address)?;
            account_permissions.push(GenesisAccountPermissions {
                address,
                permissions,
            });
            Ok(false)
        })?;

    let mut disabled_type_urls = BTreeMap::new();
    keeper
        .disable_list
        .walk::<CircuitError, _>(store, |type_url, record| {
            disabled_type_urls.insert(type_url, record);
            Ok(false)
        })?;

    tracing::info!(
        permissions = account_permissions.len(),
        disabled = disabled_type_urls.len(),
        "exported circuit genesis"
    );

    Ok(GenesisState {
        account_permissions,
        disabled_type_urls,
    })
}

pub(crate) fn init_genesis_impl(
    keeper: &Keeper,
    store: &dyn KvStore,
    state: &GenesisState,
) -> CircuitResult<()> {
    state.validate(keeper.address_codec())?;

    for account in &state.account_permissions {
        let address = keeper.address_codec().string_to_bytes(&account.address)?;
        super::admin::set_permissions_impl(keeper, store, &address, &account.permissions)?;
    }

    for (type_url, record) in &state.disabled_type_urls {
        super::admin::trip_impl(keeper, store, type_url, record.clone())?;
    }

    tracing::info!(
        permissions = state.account_permissions.len(),
        disabled = state.disabled_type_urls.len(),
        "imported circuit genesis"
    );
    Ok(())
}
