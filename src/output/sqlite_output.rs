//! SQLite-based record sink
//!
//! Records are upserted by (source URL, config hash, position), so storing
//! the result of an unchanged configuration again replaces rows instead of
//! duplicating them.

use crate::crawler::ScrapeResult;
use crate::extract::Record;
use crate::output::schema::initialize_schema;
use crate::output::traits::{OutputResult, RecordSink};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite record sink
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens or creates a database file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Loads the stored records for a source and configuration, in order
    pub fn load_records(&self, source_url: &str, config_hash: &str) -> OutputResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT data FROM records WHERE source_url = ?1 AND config_hash = ?2 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![source_url, config_hash], |row| {
            row.get::<_, String>(0)
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    /// Number of scrapes stored so far
    pub fn count_runs(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scrape_runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Number of record rows across all sources
    pub fn count_records(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl RecordSink for SqliteSink {
    fn store(&mut self, result: &ScrapeResult, config_hash: &str) -> OutputResult<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO scrape_runs (source_url, config_hash, scraped_at, pages_visited, record_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.source_url,
                config_hash,
                result.timestamp.to_rfc3339(),
                result.pages_visited as i64,
                result.data.len() as i64
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut upsert = tx.prepare(
                "INSERT INTO records (source_url, config_hash, position, data, updated_at, run_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(source_url, config_hash, position) DO UPDATE SET
                     data = excluded.data,
                     updated_at = excluded.updated_at,
                     run_id = excluded.run_id",
            )?;

            for (position, record) in result.data.iter().enumerate() {
                let data = serde_json::to_string(record)?;
                upsert.execute(params![
                    result.source_url,
                    config_hash,
                    position as i64,
                    data,
                    now,
                    run_id
                ])?;
            }
        }

        // Rows beyond the new result length belong to an older, longer scrape
        let pruned = tx.execute(
            "DELETE FROM records WHERE source_url = ?1 AND config_hash = ?2 AND position >= ?3",
            params![result.source_url, config_hash, result.data.len() as i64],
        )?;

        tx.commit()?;

        tracing::debug!(
            "Stored {} record(s) for {} (run {}, pruned {})",
            result.data.len(),
            result.source_url,
            run_id,
            pruned
        );

        Ok(result.data.len())
    }
}
