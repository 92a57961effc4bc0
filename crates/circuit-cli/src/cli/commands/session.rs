use anyhow::Context as _;
use chrono::{DateTime, Utc};
use circuit_core::store::SqliteStore;
use circuit_core::{CircuitConfig, Keeper};
use std::path::Path;

/// Resolved config, keeper and store shared by every command.
pub(crate) struct Session {
    pub config: CircuitConfig,
    pub keeper: Keeper,
    pub store: SqliteStore,
}

impl Session {
    /// Config precedence: defaults, `--config` file, `CIRCUIT_*` env, `--db`.
    pub fn open(config_path: Option<&Path>, db: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => CircuitConfig::from_yaml_file(path)?,
            None => CircuitConfig::default(),
        }
        .with_env_overrides();
        if let Some(db) = db {
            config = config.with_store_path(db);
        }

        let keeper = Keeper::from_config(&config)?;
        let store = match &config.store_path {
            Some(path) => {
                ensure_parent_dir(path)?;
                SqliteStore::open(path)
                    .with_context(|| format!("failed to open store {}", path.display()))?
            }
            None => {
                tracing::warn!(
                    "no store path configured, state is kept in memory and lost on exit"
                );
                SqliteStore::memory()?
            }
        };

        Ok(Self {
            config,
            keeper,
            store,
        })
    }

    /// Fail unless the acting account may administer `type_url`.
    ///
    /// The caller defaults to the configured authority. With neither, the command
    /// runs as a trusted local operator.
    pub fn authorize(&self, caller: Option<&str>, type_url: &str) -> anyhow::Result<()> {
        let caller = caller.or(self.config.authority.as_deref());
        match caller {
            Some(caller) => {
                self.keeper
                    .ensure_may_administer(&self.store, caller, type_url)?;
                tracing::debug!(caller, msg.url = %type_url, "caller authorized");
            }
            None => {
                tracing::warn!(
                    msg.url = %type_url,
                    "no caller or authority, skipping permission check"
                );
            }
        }
        Ok(())
    }
}

/// `--at` as block time, or now.
pub(crate) fn block_time(at: Option<i64>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow::anyhow!("--at {secs} is out of range")),
        None => Ok(Utc::now()),
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
