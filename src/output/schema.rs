//! Database schema definitions
//!
//! This module contains the SQL schema for persisted scrape results.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per stored scrape
CREATE TABLE IF NOT EXISTS scrape_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    scraped_at TEXT NOT NULL,
    pages_visited INTEGER NOT NULL,
    record_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scrape_runs_source ON scrape_runs(source_url, config_hash);

-- Extracted records, keyed by position within the result
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    position INTEGER NOT NULL,
    data TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    run_id INTEGER NOT NULL REFERENCES scrape_runs(id),
    UNIQUE(source_url, config_hash, position)
);

CREATE INDEX IF NOT EXISTS idx_records_source ON records(source_url, config_hash);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
