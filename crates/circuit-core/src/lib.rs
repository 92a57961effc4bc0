//! Message-gating circuit breaker.
//!
//! Operators trip individual message types so that transactions carrying them
//! are rejected during validation, optionally exempting a bypass set of accounts
//! and optionally letting the trip lapse at a unix timestamp.
//!
//! - [`Keeper`]: permission records, the disable registry and the authorization engine
//! - [`ante::CircuitBreakerDecorator`]: the pipeline stage that gates every message
//! - [`store`]: key-value collaborators, including the per-transaction [`store::BranchStore`]
//! - [`GenesisState`]: import/export of the full state
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use circuit_core::ante::{run_tx, AnteChain, CircuitBreakerDecorator, ExecMode};
//! use circuit_core::store::MemoryStore;
//! use circuit_core::tx::{Message, Transaction};
//! use circuit_core::{FilteredUrl, HexAddressCodec, Keeper};
//!
//! # fn main() -> Result<(), circuit_core::CircuitError> {
//! let store = MemoryStore::new();
//! let keeper = Keeper::new(Arc::new(HexAddressCodec::default()));
//! keeper.trip(&store, "/bank.MsgSend", FilteredUrl::new())?;
//!
//! let chain = AnteChain::new().with(CircuitBreakerDecorator::new(keeper));
//! let tx = Transaction::new(vec![Message::legacy("/bank.MsgSend", vec![vec![1u8; 20]])]);
//!
//! let rejected = run_tx(&chain, &store, chrono::Utc::now(), &tx, ExecMode::Check);
//! assert!(rejected.is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CIRCUIT_STORE_PATH` | SQLite database file |
//! | `CIRCUIT_ADDRESS_PREFIX` | Address prefix (default: `circuit`) |
//! | `CIRCUIT_AUTHORITY` | Account that may administer every message type |

pub mod address;
pub mod ante;
pub mod config;
pub mod error;
pub mod genesis;
pub mod keeper;
pub mod store;
pub mod tx;
pub mod types;

pub use address::{AddressCodec, HexAddressCodec};
pub use config::CircuitConfig;
pub use error::{reason_codes, AddressError, CircuitError, CircuitResult, StoreError};
pub use genesis::{GenesisAccountPermissions, GenesisState};
pub use keeper::{Evaluation, Keeper, Outcome};
pub use types::{FilteredUrl, PermissionLevel, Permissions};
