use super::*;
use clap::CommandFactory;
use clap::Parser;

#[test]
fn cli_debug_assert() {
    Cli::command().debug_assert();
}

#[test]
fn trip_parses_repeated_bypass() {
    let cli = Cli::try_parse_from([
        "circuit",
        "--db",
        "state.db",
        "trip",
        "--type",
        "/test.Send",
        "--bypass",
        "circuit1aa",
        "--bypass",
        "circuit1bb",
        "--expires-at",
        "1700000000",
    ])
    .expect("parse should succeed");

    assert_eq!(cli.db, Some(PathBuf::from("state.db")));
    match cli.cmd {
        Command::Trip(args) => {
            assert_eq!(args.type_url, "/test.Send");
            assert_eq!(args.bypass, vec!["circuit1aa", "circuit1bb"]);
            assert_eq!(args.expires_at, 1_700_000_000);
            assert_eq!(args.caller, None);
        }
        _ => panic!("expected Command::Trip"),
    }
}

#[test]
fn global_flags_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["circuit", "status", "--config", "circuit.yaml", "--at", "5"])
        .expect("parse should succeed");

    assert_eq!(cli.config, Some(PathBuf::from("circuit.yaml")));
    match cli.cmd {
        Command::Status(args) => assert_eq!(args.at, Some(5)),
        _ => panic!("expected Command::Status"),
    }
}

#[test]
fn check_rejects_simulate_with_commit() {
    let err = Cli::try_parse_from(["circuit", "check", "tx.json", "--simulate", "--commit"]);
    assert!(err.is_err());

    let cli = Cli::try_parse_from(["circuit", "check", "tx.json", "--commit"]).unwrap();
    match cli.cmd {
        Command::Check(args) => {
            assert!(args.commit);
            assert!(!args.simulate);
        }
        _ => panic!("expected Command::Check"),
    }
}

#[test]
fn bypass_requires_address() {
    assert!(Cli::try_parse_from(["circuit", "bypass", "--type", "/a"]).is_err());
}

#[test]
fn genesis_import_takes_file() {
    let cli = Cli::try_parse_from(["circuit", "genesis", "import", "genesis.json"]).unwrap();
    match cli.cmd {
        Command::Genesis(GenesisArgs {
            cmd: GenesisSub::Import { file },
        }) => assert_eq!(file, PathBuf::from("genesis.json")),
        _ => panic!("expected genesis import"),
    }
}
