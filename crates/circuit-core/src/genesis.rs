//! Genesis snapshot: the full permission and trip state used to bootstrap a node.

use crate::address::AddressCodec;
use crate::error::{CircuitError, CircuitResult};
use crate::types::{FilteredUrl, PermissionLevel, Permissions};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Permissions of one account, keyed by its address string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAccountPermissions {
    pub address: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisState {
    #[serde(default)]
    pub account_permissions: Vec<GenesisAccountPermissions>,
    #[serde(default)]
    pub disabled_type_urls: BTreeMap<String, FilteredUrl>,
}

impl GenesisState {
    /// Parse a genesis document. The top level must be a JSON object.
    pub fn from_json(text: &str) -> CircuitResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CircuitError::InvalidGenesis(e.to_string()))?;
        if !value.is_object() {
            return Err(CircuitError::InvalidGenesis(
                "genesis must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| CircuitError::InvalidGenesis(e.to_string()))
    }

    pub fn from_file(path: &Path) -> CircuitResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CircuitError::InvalidGenesis(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> CircuitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CircuitError::InvalidGenesis(e.to_string()))
    }

    /// Structural checks run before any record is written.
    pub fn validate(&self, codec: &dyn AddressCodec) -> CircuitResult<()> {
        let mut seen = HashSet::new();
        for account in &self.account_permissions {
            let bytes = codec.string_to_bytes(&account.address).map_err(|e| {
                CircuitError::InvalidGenesis(format!("account {}: {e}", account.address))
            })?;
            if !seen.insert(bytes) {
                return Err(CircuitError::InvalidGenesis(format!(
                    "duplicate permissions for account {}",
                    account.address
                )));
            }
            let perms = &account.permissions;
            if perms.level == PermissionLevel::LimitedTypes && perms.limit_type_urls.is_empty() {
                return Err(CircuitError::InvalidGenesis(format!(
                    "account {} has level limited_types with no type urls",
                    account.address
                )));
            }
        }

        for (type_url, trip) in &self.disabled_type_urls {
            if type_url.trim().is_empty() {
                return Err(CircuitError::InvalidGenesis(
                    "empty disabled type url".to_string(),
                ));
            }
            if trip.expires_at < 0 {
                return Err(CircuitError::InvalidGenesis(format!(
                    "{type_url}: negative expires_at {}",
                    trip.expires_at
                )));
            }
            for bypass in &trip.bypass_set {
                codec.string_to_bytes(bypass).map_err(|e| {
                    CircuitError::InvalidGenesis(format!("{type_url}: bypass {bypass}: {e}"))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::HexAddressCodec;

    fn addr(byte: u8) -> String {
        HexAddressCodec::default()
            .bytes_to_string(&[byte; 20])
            .unwrap()
    }

    #[test]
    fn test_validate_accepts_well_formed_state() {
        let mut state = GenesisState::default();
        state.account_permissions.push(GenesisAccountPermissions {
            address: addr(1),
            permissions: Permissions::limited(["/test.Send"]),
        });
        state.disabled_type_urls.insert(
            "/test.Send".into(),
            FilteredUrl::new().with_bypass([addr(2)]).with_expiry(10),
        );

        state.validate(&HexAddressCodec::default()).unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty_limits() {
        let codec = HexAddressCodec::default();

        let mut dup = GenesisState::default();
        for _ in 0..2 {
            dup.account_permissions.push(GenesisAccountPermissions {
                address: addr(1),
                permissions: Permissions::all_types(),
            });
        }
        assert!(matches!(
            dup.validate(&codec),
            Err(CircuitError::InvalidGenesis(msg)) if msg.contains("duplicate")
        ));

        let mut empty_limit = GenesisState::default();
        empty_limit.account_permissions.push(GenesisAccountPermissions {
            address: addr(1),
            permissions: Permissions::limited(Vec::<String>::new()),
        });
        assert!(empty_limit.validate(&codec).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_bypass_and_negative_expiry() {
        let codec = HexAddressCodec::default();

        let mut bad_bypass = GenesisState::default();
        bad_bypass.disabled_type_urls.insert(
            "/test.Send".into(),
            FilteredUrl::new().with_bypass(["nobody"]),
        );
        assert!(bad_bypass.validate(&codec).is_err());

        let mut negative = GenesisState::default();
        negative
            .disabled_type_urls
            .insert("/test.Send".into(), FilteredUrl::new().with_expiry(-1));
        assert!(negative.validate(&codec).is_err());
    }

    #[test]
    fn test_parse_minimal_json() {
        let state = GenesisState::from_json(r#"{"disabled_type_urls":{"/a":{}}}"#).unwrap();
        assert!(state.account_permissions.is_empty());
        assert_eq!(state.disabled_type_urls["/a"], FilteredUrl::default());

        assert!(matches!(
            GenesisState::from_json("[]"),
            Err(CircuitError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = GenesisState::from_json(r#"{"disabled_types":{"/a":{}}}"#).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::InvalidGenesis(msg) if msg.contains("disabled_types")
        ));

        let account = format!(
            r#"{{"account_permissions":[{{"address":"{}","permissions":{{"level":"all_types"}},"extra":1}}]}}"#,
            addr(1)
        );
        assert!(GenesisState::from_json(&account).is_err());
        assert!(GenesisState::from_json("\"text\"").is_err());
    }

    #[test]
    fn test_validate_rejects_blank_type_url() {
        let mut blank = GenesisState::default();
        blank
            .disabled_type_urls
            .insert("   ".into(), FilteredUrl::new());
        assert!(matches!(
            blank.validate(&HexAddressCodec::default()),
            Err(CircuitError::InvalidGenesis(_))
        ));
    }
}
