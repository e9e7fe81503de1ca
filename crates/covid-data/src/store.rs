//! Persistence boundary for cleaned case records.
//!
//! The pipeline only ever needs three operations from its store: insert-all,
//! load-all and truncate-all. [`CaseStore`] keeps that boundary explicit;
//! [`CsvStore`] is the file-backed implementation used by the binary and
//! [`MemoryStore`] backs tests that don't touch the filesystem.

use std::path::PathBuf;

use covid_core::models::CaseRecord;
use covid_core::Result;
use tracing::{debug, info};

/// Minimal persistence contract for cleaned records.
pub trait CaseStore {
    /// Append records to the store. Returns the number inserted.
    fn insert_all(&mut self, records: &[CaseRecord]) -> Result<usize>;

    /// Load every record currently in the store. A missing or empty store
    /// yields an empty vector.
    fn load_all(&self) -> Result<Vec<CaseRecord>>;

    /// Remove all records, keeping the store usable.
    fn truncate(&mut self) -> Result<()>;
}

// ── CsvStore ──────────────────────────────────────────────────────────────────

/// File-backed store: one delimited file, header row, one line per record.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store handle for `path`. The file is created lazily on the
    /// first insert.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore { path: path.into() }
    }

    /// Rewrite the whole store atomically (temp file, then rename).
    fn write_all(&self, records: &[CaseRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CaseStore for CsvStore {
    fn insert_all(&mut self, records: &[CaseRecord]) -> Result<usize> {
        let mut all = self.load_all()?;
        all.extend_from_slice(records);
        self.write_all(&all)?;
        info!(
            "Inserted {} records into {}",
            records.len(),
            self.path.display()
        );
        Ok(records.len())
    }

    fn load_all(&self) -> Result<Vec<CaseRecord>> {
        if !self.path.exists() {
            debug!("Store file {} absent; loading nothing", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for record in reader.deserialize::<CaseRecord>() {
            records.push(record?);
        }
        Ok(records)
    }

    fn truncate(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        info!("Truncated store {}", self.path.display());
        Ok(())
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-memory store for tests and ad-hoc pipelines.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<CaseRecord>,
}

impl MemoryStore {
    /// An empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaseStore for MemoryStore {
    fn insert_all(&mut self, records: &[CaseRecord]) -> Result<usize> {
        self.records.extend_from_slice(records);
        Ok(records.len())
    }

    fn load_all(&self) -> Result<Vec<CaseRecord>> {
        Ok(self.records.clone())
    }

    fn truncate(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
