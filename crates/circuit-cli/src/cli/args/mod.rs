use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "circuit",
    version,
    about = "Message-gating circuit breaker: trip, reset and inspect disabled message types"
)]
pub struct Cli {
    /// YAML config file (CIRCUIT_* environment variables override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database (overrides config and CIRCUIT_STORE_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import or export the full permission and trip state
    Genesis(GenesisArgs),
    /// Disable a message type
    Trip(TripArgs),
    /// Re-enable a message type
    Reset(ResetArgs),
    /// Exempt accounts from an existing trip
    Bypass(BypassArgs),
    /// List currently disabled message types
    Status(StatusArgs),
    /// Run a transaction file through the circuit breaker
    Check(CheckArgs),
    Version,
}

#[derive(Args, Debug)]
pub struct GenesisArgs {
    #[command(subcommand)]
    pub cmd: GenesisSub,
}

#[derive(Subcommand, Debug)]
pub enum GenesisSub {
    /// Write the current state as genesis JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate and load a genesis JSON file
    Import {
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct TripArgs {
    /// Message type URL, e.g. /bank.v1.MsgSend
    #[arg(long = "type")]
    pub type_url: String,

    /// Account still allowed to send the type (repeatable)
    #[arg(long = "bypass")]
    pub bypass: Vec<String>,

    /// Unix seconds at which the trip lapses (0: never)
    #[arg(long, default_value_t = 0)]
    pub expires_at: i64,

    /// Account performing the change (default: configured authority)
    #[arg(long = "as")]
    pub caller: Option<String>,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    #[arg(long = "type")]
    pub type_url: String,

    #[arg(long = "as")]
    pub caller: Option<String>,
}

#[derive(Args, Debug)]
pub struct BypassArgs {
    #[arg(long = "type")]
    pub type_url: String,

    /// Account to exempt (repeatable)
    #[arg(long = "address", required = true)]
    pub addresses: Vec<String>,

    #[arg(long = "as")]
    pub caller: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Evaluate expiry at this unix time (default: now)
    #[arg(long)]
    pub at: Option<i64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Transaction JSON: {"messages":[{"@type":..., "signers":[...]}]}
    pub tx_file: PathBuf,

    /// Block time as unix seconds (default: now)
    #[arg(long)]
    pub at: Option<i64>,

    /// Dry run
    #[arg(long, conflicts_with = "commit")]
    pub simulate: bool,

    /// Keep state changes (reclaimed trips) if the transaction is accepted
    #[arg(long)]
    pub commit: bool,
}

#[cfg(test)]
mod tests;
