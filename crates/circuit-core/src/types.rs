//! Stored records: account permissions and trip records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Scope of message types an account may administer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No permission. Equivalent to having no record at all.
    #[default]
    None,
    /// Only the types listed in `limit_type_urls`.
    LimitedTypes,
    /// Any message type.
    AllTypes,
    /// Any message type; also recognised by the excluded grant/revoke path.
    SuperAdmin,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LimitedTypes => "limited_types",
            Self::AllTypes => "all_types",
            Self::SuperAdmin => "super_admin",
        }
    }
}

/// Permission record, keyed by raw account address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub level: PermissionLevel,
    /// Meaningful only for [`PermissionLevel::LimitedTypes`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limit_type_urls: Vec<String>,
}

impl Permissions {
    pub fn limited<I, S>(type_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            level: PermissionLevel::LimitedTypes,
            limit_type_urls: type_urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all_types() -> Self {
        Self {
            level: PermissionLevel::AllTypes,
            limit_type_urls: Vec::new(),
        }
    }

    pub fn super_admin() -> Self {
        Self {
            level: PermissionLevel::SuperAdmin,
            limit_type_urls: Vec::new(),
        }
    }

    /// A `None`-level record is semantically absent.
    pub fn is_none(&self) -> bool {
        self.level == PermissionLevel::None
    }

    /// Whether the holder may trip, reset or extend the bypass set of `type_url`.
    pub fn may_administer(&self, type_url: &str) -> bool {
        match self.level {
            PermissionLevel::None => false,
            PermissionLevel::LimitedTypes => self.limit_type_urls.iter().any(|t| t == type_url),
            PermissionLevel::AllTypes | PermissionLevel::SuperAdmin => true,
        }
    }
}

/// Trip record for one message type. Present only while the type is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilteredUrl {
    /// Addresses whose messages stay allowed while the type is tripped.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub bypass_set: BTreeSet<String>,
    /// Unix seconds. `0` means the trip never expires on its own.
    #[serde(default)]
    pub expires_at: i64,
}

impl FilteredUrl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bypass<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bypass_set.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn with_expiry(mut self, expires_at: i64) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn expiry(&self) -> Option<i64> {
        (self.expires_at > 0).then_some(self.expires_at)
    }

    /// Expiry is inclusive: the trip is over at exactly `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at > 0 && now >= self.expires_at
    }
}
