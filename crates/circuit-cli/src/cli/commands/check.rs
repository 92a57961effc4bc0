use super::super::args::CheckArgs;
use super::session::{block_time, Session};
use crate::exit_codes::{for_circuit_error, EXIT_SUCCESS};
use anyhow::Context as _;
use circuit_core::ante::{run_tx, AnteChain, CircuitBreakerDecorator, ExecMode};
use circuit_core::tx::JsonTx;
use circuit_core::CircuitError;

pub(crate) fn exec_mode(args: &CheckArgs) -> ExecMode {
    if args.commit {
        ExecMode::Deliver
    } else if args.simulate {
        ExecMode::Simulate
    } else {
        ExecMode::Check
    }
}

pub(crate) fn run(session: &Session, args: CheckArgs) -> anyhow::Result<i32> {
    let text = std::fs::read_to_string(&args.tx_file)
        .with_context(|| format!("failed to read {}", args.tx_file.display()))?;
    let tx = JsonTx::from_json(&text)?.decode(session.keeper.address_codec())?;
    let time = block_time(args.at)?;
    let mode = exec_mode(&args);

    let chain = AnteChain::new().with(CircuitBreakerDecorator::new(session.keeper.clone()));
    match run_tx(&chain, &session.store, time, &tx, mode) {
        Ok(outcome) => {
            println!(
                "accepted mode={:?} committed={} discarded={}",
                mode, outcome.committed_writes, outcome.discarded_writes
            );
            Ok(EXIT_SUCCESS)
        }
        Err(e @ (CircuitError::NotPermitted { .. } | CircuitError::UnsupportedMessage { .. })) => {
            println!("rejected reason={} error={}", e.reason_code(), e);
            Ok(for_circuit_error(&e))
        }
        Err(e) => Err(e.into()),
    }
}
