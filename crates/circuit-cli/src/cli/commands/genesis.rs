use super::session::Session;
use crate::exit_codes::EXIT_SUCCESS;
use anyhow::Context as _;
use circuit_core::store::BranchStore;
use circuit_core::GenesisState;
use std::path::Path;

pub(crate) fn cmd_export(session: &Session, out: Option<&Path>) -> anyhow::Result<i32> {
    let state = session.keeper.export_genesis(&session.store)?;
    let json = state.to_json_pretty()?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "genesis exported: permissions={} disabled={} file={}",
                state.account_permissions.len(),
                state.disabled_type_urls.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(EXIT_SUCCESS)
}

/// Import is all-or-nothing: records are staged on a branch and committed in one batch.
pub(crate) fn cmd_import(session: &Session, file: &Path) -> anyhow::Result<i32> {
    let state = GenesisState::from_file(file)?;
    let branch = BranchStore::new(&session.store);
    session.keeper.init_genesis(&branch, &state)?;
    let written = branch.commit()?;
    eprintln!(
        "genesis imported: permissions={} disabled={} writes={}",
        state.account_permissions.len(),
        state.disabled_type_urls.len(),
        written
    );
    Ok(EXIT_SUCCESS)
}
