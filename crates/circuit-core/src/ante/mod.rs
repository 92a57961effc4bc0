//! Transaction validation pipeline.
//!
//! A transaction passes through an [`AnteChain`] of decorators before execution.
//! Each decorator sees the [`Context`], the transaction and a [`Next`]
//! continuation for the rest of the chain; it either rejects the transaction
//! with an error or calls `next` exactly once.
//!
//! [`run_tx`] drives one transaction against a [`BranchStore`] so that every write
//! made during validation (the lazy reclaim of an expired trip) is committed only
//! for an accepted transaction in [`ExecMode::Deliver`].

mod circuit;
mod signers;

pub use circuit::{CircuitBreaker, CircuitBreakerDecorator};
pub use signers::resolve_signers;

use crate::error::CircuitResult;
use crate::store::{BranchStore, KvStore};
use crate::tx::Tx;
use chrono::{DateTime, Utc};

/// Per-transaction processing context.
#[derive(Clone)]
pub struct Context<'a> {
    store: &'a dyn KvStore,
    block_time: DateTime<Utc>,
    block_height: u64,
    chain_id: String,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a dyn KvStore, block_time: DateTime<Utc>) -> Self {
        Self {
            store,
            block_time,
            block_height: 0,
            chain_id: String::new(),
        }
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.block_height = height;
        self
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// Store of the current unit of work.
    pub fn store(&self) -> &'a dyn KvStore {
        self.store
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.block_time
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("block_time", &self.block_time)
            .field("block_height", &self.block_height)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// Continuation into the remaining decorators.
pub struct Next<'n, 'a> {
    run: Box<dyn FnOnce(Context<'a>) -> CircuitResult<Context<'a>> + 'n>,
}

impl<'n, 'a> Next<'n, 'a> {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(Context<'a>) -> CircuitResult<Context<'a>> + 'n,
    {
        Self { run: Box::new(run) }
    }

    /// Terminal continuation: returns the context unchanged.
    pub fn terminal() -> Self
    where
        'a: 'n,
    {
        Self::new(Ok)
    }

    pub fn run(self, ctx: Context<'a>) -> CircuitResult<Context<'a>> {
        (self.run)(ctx)
    }
}

/// One stage of the validation pipeline.
pub trait AnteDecorator: Send + Sync {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_, 'a>,
    ) -> CircuitResult<Context<'a>>;
}

/// Ordered decorators, run outermost first.
#[derive(Default)]
pub struct AnteChain {
    decorators: Vec<Box<dyn AnteDecorator>>,
}

impl AnteChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, decorator: impl AnteDecorator + 'static) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    pub fn handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
    ) -> CircuitResult<Context<'a>> {
        self.run_from(0, ctx, tx, simulate)
    }

    fn run_from<'a>(
        &self,
        index: usize,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
    ) -> CircuitResult<Context<'a>> {
        match self.decorators.get(index) {
            None => Next::terminal().run(ctx),
            Some(decorator) => {
                let next = Next::new(move |ctx| self.run_from(index + 1, ctx, tx, simulate));
                decorator.ante_handle(ctx, tx, simulate, next)
            }
        }
    }
}

/// How a transaction is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Mempool admission. State changes are never kept.
    Check,
    /// Dry run. State changes are never kept.
    Simulate,
    /// Block execution. State changes are kept if the transaction is accepted.
    Deliver,
}

impl ExecMode {
    pub fn is_simulate(&self) -> bool {
        matches!(self, Self::Simulate)
    }
}

/// What happened to the writes of one [`run_tx`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOutcome {
    pub committed_writes: usize,
    pub discarded_writes: usize,
}

/// Validate `tx` through `chain` inside its own unit of work over `store`.
///
/// Writes are committed to `store` only in [`ExecMode::Deliver`] and only when
/// the chain accepts the transaction. A rejection is returned as the chain's
/// error after its writes have been discarded.
pub fn run_tx(
    chain: &AnteChain,
    store: &dyn KvStore,
    block_time: DateTime<Utc>,
    tx: &dyn Tx,
    mode: ExecMode,
) -> CircuitResult<TxOutcome> {
    let branch = BranchStore::new(store);
    let result = chain
        .handle(Context::new(&branch, block_time), tx, mode.is_simulate())
        .map(|_| ());

    match result {
        Ok(()) if mode == ExecMode::Deliver => {
            let committed_writes = branch.commit()?;
            tracing::debug!(committed_writes, "transaction accepted, writes committed");
            Ok(TxOutcome {
                committed_writes,
                discarded_writes: 0,
            })
        }
        Ok(()) => {
            let discarded_writes = branch.discard();
            tracing::debug!(
                mode = ?mode,
                discarded_writes,
                "transaction accepted, writes discarded"
            );
            Ok(TxOutcome {
                committed_writes: 0,
                discarded_writes,
            })
        }
        Err(e) => {
            let discarded_writes = branch.discard();
            tracing::debug!(discarded_writes, error = %e, "transaction rejected, writes discarded");
            Err(e)
        }
    }
}
