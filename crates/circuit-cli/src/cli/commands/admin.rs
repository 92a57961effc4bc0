use super::super::args::{BypassArgs, ResetArgs, TripArgs};
use super::session::Session;
use crate::exit_codes::{EXIT_REJECTED, EXIT_SUCCESS};
use circuit_core::FilteredUrl;

pub(crate) fn cmd_trip(session: &Session, args: TripArgs) -> anyhow::Result<i32> {
    session.authorize(args.caller.as_deref(), &args.type_url)?;
    let record = FilteredUrl::new()
        .with_bypass(args.bypass)
        .with_expiry(args.expires_at);
    session.keeper.trip(&session.store, &args.type_url, record)?;
    eprintln!(
        "circuit tripped: type={} expires_at={}",
        args.type_url, args.expires_at
    );
    Ok(EXIT_SUCCESS)
}

pub(crate) fn cmd_reset(session: &Session, args: ResetArgs) -> anyhow::Result<i32> {
    session.authorize(args.caller.as_deref(), &args.type_url)?;
    if session.keeper.reset(&session.store, &args.type_url)? {
        eprintln!("circuit reset: type={}", args.type_url);
    } else {
        eprintln!("circuit not tripped: type={}", args.type_url);
    }
    Ok(EXIT_SUCCESS)
}

pub(crate) fn cmd_bypass(session: &Session, args: BypassArgs) -> anyhow::Result<i32> {
    session.authorize(args.caller.as_deref(), &args.type_url)?;
    if session
        .keeper
        .add_bypass(&session.store, &args.type_url, &args.addresses)?
    {
        eprintln!(
            "bypass extended: type={} added={}",
            args.type_url,
            args.addresses.len()
        );
        Ok(EXIT_SUCCESS)
    } else {
        eprintln!("circuit not tripped: type={}", args.type_url);
        Ok(EXIT_REJECTED)
    }
}
