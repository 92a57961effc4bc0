//! Circuit keeper: permission store, disable registry and the authorization engine.
//!
//! Flow of one authorization check:
//! 1. Look up the trip record for the message type (absent: allowed)
//! 2. Any signer in the bypass set: allowed, record untouched
//! 3. Trip expired: delete the record in the caller's store, allowed
//! 4. Otherwise: denied
//!
//! The keeper holds no store handle. Every operation takes the store of the
//! current unit of work, so the deletion in step 3 commits or rolls back with the
//! transaction that triggered it.

use crate::address::AddressCodec;
use crate::ante::CircuitBreaker;
use crate::config::CircuitConfig;
use crate::error::CircuitResult;
use crate::genesis::GenesisState;
use crate::store::{BytesKey, KvStore, Map, StringKey};
use crate::types::{FilteredUrl, Permissions};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[path = "keeper_internal/mod.rs"]
mod keeper_internal;

/// Store prefix of the permission records.
pub const ACCOUNT_PERMISSION_PREFIX: u8 = 0x01;
/// Store prefix of the trip records.
pub const DISABLE_LIST_PREFIX: u8 = 0x02;

/// Why a message type was allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No trip record: allowed by default.
    NotTripped,
    /// A signer is in the bypass set.
    Bypassed,
    /// The trip reached its expiry.
    Expired,
    /// Tripped and no exemption applies.
    Tripped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotTripped => "not_tripped",
            Self::Bypassed => "bypassed",
            Self::Expired => "expired",
            Self::Tripped => "tripped",
        }
    }
}

/// Result of [`Keeper::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub allowed: bool,
    pub outcome: Outcome,
    /// True when the evaluation deleted an expired trip record.
    pub reclaimed: bool,
}

impl Evaluation {
    pub(crate) fn allow(outcome: Outcome) -> Self {
        Self {
            allowed: true,
            outcome,
            reclaimed: false,
        }
    }

    pub(crate) fn reclaimed() -> Self {
        Self {
            allowed: true,
            outcome: Outcome::Expired,
            reclaimed: true,
        }
    }

    pub(crate) fn deny() -> Self {
        Self {
            allowed: false,
            outcome: Outcome::Tripped,
            reclaimed: false,
        }
    }
}

/// Circuit keeper.
#[derive(Clone)]
pub struct Keeper {
    address_codec: Arc<dyn AddressCodec>,
    authority: Option<Vec<u8>>,
    /// Permission records keyed by raw account address.
    pub permissions: Map<BytesKey, Permissions>,
    /// Trip records keyed by message type URL.
    pub disable_list: Map<StringKey, FilteredUrl>,
}

impl Keeper {
    pub fn new(address_codec: Arc<dyn AddressCodec>) -> Self {
        Self {
            address_codec,
            authority: None,
            permissions: Map::new(ACCOUNT_PERMISSION_PREFIX, "permissions"),
            disable_list: Map::new(DISABLE_LIST_PREFIX, "disable_list"),
        }
    }

    /// Keeper with the config's address prefix and authority.
    pub fn from_config(config: &CircuitConfig) -> CircuitResult<Self> {
        config.validate()?;
        let keeper = Self::new(Arc::new(config.address_codec()));
        match &config.authority {
            Some(authority) => keeper.with_authority(authority),
            None => Ok(keeper),
        }
    }

    /// Set the account that may administer every message type.
    pub fn with_authority(mut self, authority: &str) -> CircuitResult<Self> {
        self.authority = Some(self.address_codec.string_to_bytes(authority)?);
        Ok(self)
    }

    pub fn authority(&self) -> Option<&[u8]> {
        self.authority.as_deref()
    }

    pub fn address_codec(&self) -> &dyn AddressCodec {
        self.address_codec.as_ref()
    }

    /// Decide whether `type_url` may execute for `signers` at unix time `now`.
    ///
    /// This is the only read path with a write side effect: an expired trip is
    /// deleted from `store` and reported through [`Evaluation::reclaimed`]. A
    /// failed deletion is returned as an error, never as an allow.
    pub fn evaluate(
        &self,
        store: &dyn KvStore,
        now: i64,
        type_url: &str,
        signers: &[Vec<u8>],
    ) -> CircuitResult<Evaluation> {
        keeper_internal::engine::evaluate_impl(self, store, now, type_url, signers)
    }

    /// Permission record of an account. A `None`-level record reads as absent.
    pub fn get_permissions(
        &self,
        store: &dyn KvStore,
        address: &[u8],
    ) -> CircuitResult<Option<Permissions>> {
        keeper_internal::admin::get_permissions_impl(self, store, address)
    }

    /// Store a permission record. A `None`-level record removes the entry.
    pub fn set_permissions(
        &self,
        store: &dyn KvStore,
        address: &[u8],
        permissions: &Permissions,
    ) -> CircuitResult<()> {
        keeper_internal::admin::set_permissions_impl(self, store, address, permissions)
    }

    /// Delete the permission record of an account, if any.
    pub fn remove_permissions(&self, store: &dyn KvStore, address: &[u8]) -> CircuitResult<()> {
        self.permissions.remove(store, address)?;
        Ok(())
    }

    /// Raw trip record, expired or not.
    pub fn get_trip(
        &self,
        store: &dyn KvStore,
        type_url: &str,
    ) -> CircuitResult<Option<FilteredUrl>> {
        Ok(self.disable_list.get(store, type_url)?)
    }

    /// Fail with `Unauthorized` unless `caller` may administer `type_url`.
    pub fn ensure_may_administer(
        &self,
        store: &dyn KvStore,
        caller: &str,
        type_url: &str,
    ) -> CircuitResult<()> {
        keeper_internal::admin::ensure_may_administer_impl(self, store, caller, type_url)
    }

    /// Disable `type_url`, replacing any existing trip record.
    pub fn trip(
        &self,
        store: &dyn KvStore,
        type_url: &str,
        record: FilteredUrl,
    ) -> CircuitResult<()> {
        keeper_internal::admin::trip_impl(self, store, type_url, record)
    }

    /// Re-enable `type_url`. Returns whether a trip record existed.
    pub fn reset(&self, store: &dyn KvStore, type_url: &str) -> CircuitResult<bool> {
        keeper_internal::admin::reset_impl(self, store, type_url)
    }

    /// Extend the bypass set of a tripped type. Returns `false` if it is not tripped.
    pub fn add_bypass(
        &self,
        store: &dyn KvStore,
        type_url: &str,
        addresses: &[String],
    ) -> CircuitResult<bool> {
        keeper_internal::admin::add_bypass_impl(self, store, type_url, addresses)
    }

    /// Active trips at `now`, in type order. Expired trips are reclaimed on the way.
    pub fn disabled_types(
        &self,
        store: &dyn KvStore,
        now: i64,
    ) -> CircuitResult<Vec<(String, FilteredUrl)>> {
        keeper_internal::admin::disabled_types_impl(self, store, now)
    }

    /// Snapshot both collections in key order.
    pub fn export_genesis(&self, store: &dyn KvStore) -> CircuitResult<GenesisState> {
        keeper_internal::genesis::export_genesis_impl(self, store)
    }

    /// Validate `state`, then write every record. Errors are fatal to bootstrap.
    pub fn init_genesis(&self, store: &dyn KvStore, state: &GenesisState) -> CircuitResult<()> {
        keeper_internal::genesis::init_genesis_impl(self, store, state)
    }
}

impl CircuitBreaker for Keeper {
    fn is_allowed(
        &self,
        store: &dyn KvStore,
        block_time: DateTime<Utc>,
        type_url: &str,
        signers: &[Vec<u8>],
    ) -> CircuitResult<bool> {
        Ok(self
            .evaluate(store, block_time.timestamp(), type_url, signers)?
            .allowed)
    }
}
