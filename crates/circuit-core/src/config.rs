//! Runtime configuration.
//!
//! Sources, lowest precedence first: defaults, YAML file, environment.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CIRCUIT_STORE_PATH` | SQLite database file (unset: in-memory store) |
//! | `CIRCUIT_ADDRESS_PREFIX` | Human-readable address prefix (default: `circuit`) |
//! | `CIRCUIT_AUTHORITY` | Account that may administer every message type |

use crate::address::{AddressCodec, HexAddressCodec, DEFAULT_ADDRESS_PREFIX};
use crate::error::{CircuitError, CircuitResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_STORE_PATH: &str = "CIRCUIT_STORE_PATH";
pub const ENV_ADDRESS_PREFIX: &str = "CIRCUIT_ADDRESS_PREFIX";
pub const ENV_AUTHORITY: &str = "CIRCUIT_AUTHORITY";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CircuitConfig {
    /// SQLite database file. `None` keeps state in memory.
    pub store_path: Option<PathBuf>,

    /// Prefix of human-readable account addresses.
    pub address_prefix: String,

    /// Account allowed to administer any message type regardless of its permission record.
    pub authority: Option<String>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
            authority: None,
        }
    }
}

impl CircuitConfig {
    pub fn from_yaml_str(text: &str) -> CircuitResult<Self> {
        serde_yaml::from_str(text).map_err(|e| CircuitError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> CircuitResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CircuitError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `CIRCUIT_*` variables on top of this config. Empty values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = non_empty_env(ENV_STORE_PATH) {
            self.store_path = Some(PathBuf::from(path));
        }
        if let Some(prefix) = non_empty_env(ENV_ADDRESS_PREFIX) {
            self.address_prefix = prefix;
        }
        if let Some(authority) = non_empty_env(ENV_AUTHORITY) {
            self.authority = Some(authority);
        }
        self
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    pub fn address_codec(&self) -> HexAddressCodec {
        HexAddressCodec::new(&self.address_prefix)
    }

    pub fn validate(&self) -> CircuitResult<()> {
        if self.address_prefix.is_empty()
            || !self
                .address_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CircuitError::Config(format!(
                "address_prefix must be non-empty lowercase alphanumeric, got '{}'",
                self.address_prefix
            )));
        }

        if let Some(authority) = &self.authority {
            self.address_codec()
                .string_to_bytes(authority)
                .map_err(|e| CircuitError::Config(format!("authority: {e}")))?;
        }

        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [ENV_STORE_PATH, ENV_ADDRESS_PREFIX, ENV_AUTHORITY] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_yaml_fills_defaults() {
        let cfg = CircuitConfig::from_yaml_str("store_path: /var/lib/circuit.db\n").unwrap();
        assert_eq!(cfg.store_path, Some(PathBuf::from("/var/lib/circuit.db")));
        assert_eq!(cfg.address_prefix, DEFAULT_ADDRESS_PREFIX);
        assert_eq!(cfg.authority, None);
    }

    #[test]
    fn test_validate_prefix_and_authority() {
        let mut cfg = CircuitConfig::default();
        cfg.validate().unwrap();

        cfg.address_prefix = "Bad-Prefix".into();
        assert!(matches!(cfg.validate(), Err(CircuitError::Config(_))));

        let cfg = CircuitConfig::default().with_authority("someone");
        assert!(cfg.validate().is_err());

        let authority = HexAddressCodec::default().bytes_to_string(&[3u8; 20]).unwrap();
        CircuitConfig::default()
            .with_authority(authority)
            .validate()
            .unwrap();
    }

    #[test]
    #[serial]
    fn test_env_overrides_yaml() {
        clear_env();
        std::env::set_var(ENV_ADDRESS_PREFIX, "chain");
        std::env::set_var(ENV_STORE_PATH, "/tmp/env.db");
        std::env::set_var(ENV_AUTHORITY, "   ");

        let cfg = CircuitConfig::from_yaml_str("address_prefix: yaml\nstore_path: /tmp/yaml.db\n")
            .unwrap()
            .with_env_overrides();

        assert_eq!(cfg.address_prefix, "chain");
        assert_eq!(cfg.store_path, Some(PathBuf::from("/tmp/env.db")));
        assert_eq!(cfg.authority, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_is_default() {
        clear_env();
        assert_eq!(CircuitConfig::from_env(), CircuitConfig::default());
    }
}
