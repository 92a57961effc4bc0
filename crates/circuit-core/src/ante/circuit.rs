//! Circuit breaker stage of the validation pipeline.

use super::{resolve_signers, AnteDecorator, Context, Next};
use crate::error::{CircuitError, CircuitResult};
use crate::store::KvStore;
use crate::tx::Tx;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Authorization source consulted by [`CircuitBreakerDecorator`].
pub trait CircuitBreaker: Send + Sync {
    /// Whether `type_url` may execute for `signers` at `block_time`.
    ///
    /// May delete an expired trip record from `store`.
    fn is_allowed(
        &self,
        store: &dyn KvStore,
        block_time: DateTime<Utc>,
        type_url: &str,
        signers: &[Vec<u8>],
    ) -> CircuitResult<bool>;

    /// Router-level check with no signers, so no bypass can apply.
    fn is_type_allowed(
        &self,
        store: &dyn KvStore,
        block_time: DateTime<Utc>,
        type_url: &str,
    ) -> CircuitResult<bool> {
        self.is_allowed(store, block_time, type_url, &[])
    }
}

impl<T: CircuitBreaker + ?Sized> CircuitBreaker for Arc<T> {
    fn is_allowed(
        &self,
        store: &dyn KvStore,
        block_time: DateTime<Utc>,
        type_url: &str,
        signers: &[Vec<u8>],
    ) -> CircuitResult<bool> {
        (**self).is_allowed(store, block_time, type_url, signers)
    }
}

/// Rejects a transaction if any of its messages is tripped.
///
/// Messages are checked in order and the first failure wins: later messages are
/// never evaluated. The next stage runs only when every message is allowed.
pub struct CircuitBreakerDecorator<C> {
    circuit_keeper: C,
}

impl<C: CircuitBreaker> CircuitBreakerDecorator<C> {
    pub fn new(circuit_keeper: C) -> Self {
        Self { circuit_keeper }
    }
}

impl<C: CircuitBreaker> AnteDecorator for CircuitBreakerDecorator<C> {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_, 'a>,
    ) -> CircuitResult<Context<'a>> {
        for msg in tx.msgs() {
            let type_url = msg.type_url();
            let signers = resolve_signers(msg)?;

            let allowed = self.circuit_keeper.is_allowed(
                ctx.store(),
                ctx.block_time(),
                type_url,
                &signers,
            )?;
            if !allowed {
                tracing::warn!(
                    msg.url = %type_url,
                    simulate,
                    "transaction rejected by circuit breaker"
                );
                return Err(CircuitError::NotPermitted {
                    type_url: type_url.to_string(),
                });
            }
        }

        next.run(ctx)
    }
}
