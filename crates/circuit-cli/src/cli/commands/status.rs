use super::super::args::StatusArgs;
use super::session::{block_time, Session};
use crate::exit_codes::EXIT_SUCCESS;
use circuit_core::FilteredUrl;

pub(crate) fn run(session: &Session, args: StatusArgs) -> anyhow::Result<i32> {
    let now = block_time(args.at)?.timestamp();
    let active = session.keeper.disabled_types(&session.store, now)?;

    if active.is_empty() {
        eprintln!("no disabled message types");
    }
    for (type_url, record) in &active {
        println!("{}", format_row(type_url, record));
    }
    Ok(EXIT_SUCCESS)
}

fn format_row(type_url: &str, record: &FilteredUrl) -> String {
    let expires = match record.expiry() {
        Some(at) => at.to_string(),
        None => "never".to_string(),
    };
    let bypass = if record.bypass_set.is_empty() {
        "-".to_string()
    } else {
        record
            .bypass_set
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    };
    format!("{type_url}\texpires={expires}\tbypass={bypass}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row() {
        assert_eq!(
            format_row("/a", &FilteredUrl::new()),
            "/a\texpires=never\tbypass=-"
        );
        assert_eq!(
            format_row("/b", &FilteredUrl::new().with_bypass(["x", "y"]).with_expiry(7)),
            "/b\texpires=7\tbypass=x,y"
        );
    }

    #[test]
    fn test_status_reclaims_expired() {
        let dir = tempfile::tempdir().unwrap();
        let s = Session::open(None, Some(&dir.path().join("circuit.db"))).unwrap();
        s.keeper
            .trip(&s.store, "/a", FilteredUrl::new().with_expiry(10))
            .unwrap();

        run(&s, StatusArgs { at: Some(10) }).unwrap();
        assert_eq!(s.keeper.get_trip(&s.store, "/a").unwrap(), None);
    }
}
