//! The ledger: ordered review records and their on-disk CSV snapshot.

use crate::config::AppConfig;
use crate::error::{LedgerError, Result};
use crate::models::{Decision, Record, Status};
use crate::scanner;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use storage::{LedgerRow, StorageError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<Record>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub keep: usize,
    pub remove: usize,
    pub unsure: usize,
    pub unassigned: usize,
}

impl Summary {
    pub fn reviewed(&self) -> usize {
        self.total - self.unassigned
    }
}

impl Ledger {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// One unassigned record per path, in the given order.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let records = paths
            .into_iter()
            .map(|p| Record::unassigned(p.as_ref().to_string_lossy().into_owned()))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Result<&Record> {
        self.records.get(index).ok_or(LedgerError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn status_of(&self, index: usize) -> Result<Status> {
        self.get(index).map(Record::status)
    }

    /// Sets exactly one flag at `index`. Returns the status the record had before.
    pub fn set_status(&mut self, index: usize, decision: Decision) -> Result<Status> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        let before = record.status();
        record.set_status(decision);
        debug!("record {} {:?}: {} -> {}", index, record.path, before, decision);
        Ok(before)
    }

    pub fn first_unassigned(&self) -> Option<usize> {
        self.records.iter().position(Record::is_unassigned)
    }

    /// Indices of records whose derived status is `status`.
    pub fn indices_with(&self, status: Status) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status() == status)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn conflicting_rows(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_conflicting_flags())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            total: self.records.len(),
            ..Summary::default()
        };
        for r in &self.records {
            match r.status() {
                Status::Keep => s.keep += 1,
                Status::Remove => s.remove += 1,
                Status::Unsure => s.unsure += 1,
                Status::Unassigned => s.unassigned += 1,
            }
        }
        s
    }

    fn to_rows(&self) -> Vec<LedgerRow> {
        self.records.iter().map(LedgerRow::from).collect()
    }
}

/// Where the ledger lives on disk.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.ledger_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the ledger if the file exists. Otherwise snapshots `source_dir` into a
    /// fresh all-unassigned ledger and writes it. An existing file is never reconciled
    /// with the directory.
    pub fn initialize(&self, source_dir: &Path) -> Result<Ledger> {
        if self.exists() {
            return self.load();
        }

        let paths = scanner::scan(source_dir)?;
        let ledger = Ledger::from_paths(paths);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::LedgerFileUnwritable {
                path: self.path.clone(),
                source: StorageError::Io(e),
            })?;
        }
        self.save(&ledger)?;
        info!(
            "created ledger {:?} with {} records from {:?}",
            self.path,
            ledger.len(),
            source_dir
        );
        Ok(ledger)
    }

    pub fn load(&self) -> Result<Ledger> {
        let rows = storage::read_rows(&self.path).map_err(|source| {
            LedgerError::LedgerFileUnreadable {
                path: self.path.clone(),
                source,
            }
        })?;
        let ledger = Ledger::new(rows.into_iter().map(Record::from).collect());
        for index in ledger.conflicting_rows() {
            warn!(
                "ledger row {} ({:?}) has more than one flag set; reading it as {}",
                index,
                ledger.records[index].path,
                ledger.records[index].status()
            );
        }
        info!("loaded ledger {:?} with {} records", self.path, ledger.len());
        Ok(ledger)
    }

    /// Overwrites the file with the full ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        storage::write_rows(&self.path, &ledger.to_rows()).map_err(|source| {
            LedgerError::LedgerFileUnwritable {
                path: self.path.clone(),
                source,
            }
        })?;
        info!("saved {} records to {:?}", ledger.len(), self.path);
        Ok(())
    }
}
