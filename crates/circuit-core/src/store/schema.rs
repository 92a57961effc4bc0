//! SQLite schema for the key-value backend.
//!
//! Tables:
//! - `kv`: ordered byte keys to encoded records

/// DDL for the key-value table.
///
/// Schema version: 1
pub const KV_SCHEMA: &str = r#"
-- BLOB keys compare with memcmp, which gives the byte order prefix scans rely on
CREATE TABLE IF NOT EXISTS kv (
    key    BLOB PRIMARY KEY,
    value  BLOB NOT NULL
) WITHOUT ROWID;
"#;
