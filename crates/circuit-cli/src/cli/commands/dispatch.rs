use super::super::args::*;
use super::session::Session;
use crate::exit_codes::EXIT_SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    if let Command::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(EXIT_SUCCESS);
    }

    let session = Session::open(cli.config.as_deref(), cli.db.as_deref())?;
    match cli.cmd {
        Command::Genesis(args) => match args.cmd {
            GenesisSub::Export { out } => super::genesis::cmd_export(&session, out.as_deref()),
            GenesisSub::Import { file } => super::genesis::cmd_import(&session, &file),
        },
        Command::Trip(args) => super::admin::cmd_trip(&session, args),
        Command::Reset(args) => super::admin::cmd_reset(&session, args),
        Command::Bypass(args) => super::admin::cmd_bypass(&session, args),
        Command::Status(args) => super::status::run(&session, args),
        Command::Check(args) => super::check::run(&session, args),
        Command::Version => Ok(EXIT_SUCCESS),
    }
}
