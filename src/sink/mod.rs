// src/sink/mod.rs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::harvest::Record;

/// CSV destination for one view's harvest.
///
/// The header is written exactly once per destination, tracked across the
/// whole scroll sequence by a per-sink flag. The first non-empty batch
/// truncates whatever an earlier run left at the path; every later batch
/// appends. An empty batch is a no-op and never creates the file. Batches
/// are serialized in memory and written in a single call, so a failed
/// batch leaves earlier rows untouched.
pub struct CsvSink {
    path: PathBuf,
    wrote_header: bool,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wrote_header: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one batch of records, writing the header first if this is the
    /// destination's first non-empty batch.
    pub fn append(&mut self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!self.wrote_header)
            .from_writer(Vec::new());
        for record in records {
            writer.serialize(record).context("serializing record")?;
        }
        writer.flush().context("flushing csv buffer")?;
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("finishing csv buffer: {}", e))?;

        let mut options = OpenOptions::new();
        if self.wrote_header {
            options.append(true);
        } else {
            // Fresh run over an existing destination starts the file over.
            options.write(true).truncate(true);
        }
        let mut file = options
            .create(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(&bytes)
            .with_context(|| format!("appending to {}", self.path.display()))?;

        self.wrote_header = true;
        Ok(())
    }
}
