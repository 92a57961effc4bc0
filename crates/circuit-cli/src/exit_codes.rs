//! Exit codes of the `circuit` binary. Part of the public contract.

use circuit_core::{CircuitError, StoreError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_REJECTED: i32 = 1; // Transaction or admin request rejected
pub const EXIT_CONFIG_ERROR: i32 = 2; // Bad config, bad input or internal failure
pub const EXIT_STORE_ERROR: i32 = 3; // Storage or genesis failure

pub fn for_circuit_error(err: &CircuitError) -> i32 {
    match err {
        CircuitError::NotPermitted { .. }
        | CircuitError::UnsupportedMessage { .. }
        | CircuitError::Unauthorized { .. } => EXIT_REJECTED,
        CircuitError::Store(_) | CircuitError::InvalidGenesis(_) => EXIT_STORE_ERROR,
        CircuitError::Address(_) | CircuitError::InvalidRecord(_) | CircuitError::Config(_) => {
            EXIT_CONFIG_ERROR
        }
    }
}

/// Exit code for a command failure that escaped to `main`.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<CircuitError>() {
        return for_circuit_error(e);
    }
    if err.downcast_ref::<StoreError>().is_some() {
        return EXIT_STORE_ERROR;
    }
    EXIT_CONFIG_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_map_to_one() {
        let e = CircuitError::NotPermitted {
            type_url: "/a".into(),
        };
        assert_eq!(for_circuit_error(&e), EXIT_REJECTED);
    }

    #[test]
    fn test_anyhow_downcast() {
        let store = anyhow::Error::new(StoreError::Poisoned);
        assert_eq!(for_error(&store), EXIT_STORE_ERROR);

        let genesis = anyhow::Error::new(CircuitError::InvalidGenesis("x".into()));
        assert_eq!(for_error(&genesis), EXIT_STORE_ERROR);

        assert_eq!(for_error(&anyhow::anyhow!("bad flag")), EXIT_CONFIG_ERROR);
    }
}
