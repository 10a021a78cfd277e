//! JSON output
//!
//! Writes scrape results in the boundary format: `source_url`, `timestamp`
//! and `data`, with fields as `null`, a string or a list of strings.

use crate::crawler::ScrapeResult;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sink that writes each result as pretty-printed JSON
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonSink<BufWriter<File>> {
    /// Creates (or truncates) a file to write into
    pub fn create(path: &Path) -> OutputResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn store(&mut self, result: &ScrapeResult, _config_hash: &str) -> OutputResult<usize> {
        serde_json::to_writer_pretty(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(result.data.len())
    }
}
