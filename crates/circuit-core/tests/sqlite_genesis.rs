//! File-backed store: genesis import survives a reopen and drives decisions.

use circuit_core::ante::{run_tx, AnteChain, CircuitBreakerDecorator, ExecMode};
use circuit_core::store::SqliteStore;
use circuit_core::tx::JsonTx;
use circuit_core::{CircuitConfig, CircuitError, GenesisState, Keeper, Permissions};
use tempfile::TempDir;

fn addr(byte: u8) -> String {
    format!("circuit1{}", hex_byte(byte).repeat(20))
}

fn hex_byte(byte: u8) -> String {
    format!("{byte:02x}")
}

fn genesis_json() -> String {
    format!(
        r#"{{
  "account_permissions": [
    {{"address": "{admin}", "permissions": {{"level": "all_types"}}}},
    {{"address": "{ops}", "permissions": {{"level": "limited_types", "limit_type_urls": ["/bank.MsgSend"]}}}}
  ],
  "disabled_type_urls": {{
    "/bank.MsgSend": {{"bypass_set": ["{ops}"], "expires_at": 0}},
    "/gov.MsgVote": {{"expires_at": 1700000000}}
  }}
}}"#,
        admin = addr(0xaa),
        ops = addr(0x0b),
    )
}

#[test]
fn test_import_reopen_and_check() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let db = dir.path().join("circuit.db");
    let config = CircuitConfig::default().with_store_path(&db);
    let keeper = Keeper::from_config(&config)?;

    {
        let store = SqliteStore::open(&db)?;
        let state = GenesisState::from_json(&genesis_json())?;
        keeper.init_genesis(&store, &state)?;
    }

    let store = SqliteStore::open(&db)?;
    let exported = keeper.export_genesis(&store)?;
    assert_eq!(exported.account_permissions.len(), 2);
    assert_eq!(exported.disabled_type_urls.len(), 2);
    assert_eq!(
        keeper.get_permissions(&store, &[0xaa; 20])?,
        Some(Permissions::all_types())
    );

    let chain = AnteChain::new().with(CircuitBreakerDecorator::new(keeper.clone()));
    let tx = JsonTx::from_json(&format!(
        r#"{{"messages":[{{"@type":"/bank.MsgSend","signers":["{}"]}}]}}"#,
        addr(0x01)
    ))?
    .decode(keeper.address_codec())?;
    let now = chrono::Utc::now();

    let err = run_tx(&chain, &store, now, &tx, ExecMode::Check).unwrap_err();
    assert!(matches!(err, CircuitError::NotPermitted { .. }));

    let bypassed = JsonTx::from_json(&format!(
        r#"{{"messages":[{{"@type":"/bank.MsgSend","signers":["{}"]}}]}}"#,
        addr(0x0b)
    ))?
    .decode(keeper.address_codec())?;
    run_tx(&chain, &store, now, &bypassed, ExecMode::Check)?;

    // The vote trip has lapsed; delivering reclaims it on disk.
    let vote = JsonTx::from_json(&format!(
        r#"{{"messages":[{{"@type":"/gov.MsgVote","signers":["{}"]}}]}}"#,
        addr(0x01)
    ))?
    .decode(keeper.address_codec())?;
    let outcome = run_tx(&chain, &store, now, &vote, ExecMode::Deliver)?;
    assert_eq!(outcome.committed_writes, 1);

    let reopened = SqliteStore::open(&db)?;
    assert_eq!(keeper.get_trip(&reopened, "/gov.MsgVote")?, None);
    assert!(keeper.get_trip(&reopened, "/bank.MsgSend")?.is_some());
    Ok(())
}

#[test]
fn test_admin_rights_from_genesis() -> anyhow::Result<()> {
    let store = SqliteStore::memory()?;
    let keeper = Keeper::from_config(&CircuitConfig::default())?;
    keeper.init_genesis(&store, &GenesisState::from_json(&genesis_json())?)?;

    keeper.ensure_may_administer(&store, &addr(0xaa), "/gov.MsgVote")?;
    keeper.ensure_may_administer(&store, &addr(0x0b), "/bank.MsgSend")?;
    assert!(matches!(
        keeper.ensure_may_administer(&store, &addr(0x0b), "/gov.MsgVote"),
        Err(CircuitError::Unauthorized { .. })
    ));
    Ok(())
}
