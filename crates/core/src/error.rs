use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why there is nothing to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCause {
    /// The ledger has no rows at all.
    NoRecords,
    /// Every row already carries a decision.
    AllReviewed,
}

impl fmt::Display for EmptyCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyCause::NoRecords => write!(f, "no records"),
            EmptyCause::AllReviewed => write!(f, "all records reviewed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("index {index} out of range for ledger of {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot read ledger {path:?}: {source}")]
    LedgerFileUnreadable {
        path: PathBuf,
        #[source]
        source: storage::StorageError,
    },

    #[error("cannot write ledger {path:?}: {source}")]
    LedgerFileUnwritable {
        path: PathBuf,
        #[source]
        source: storage::StorageError,
    },

    #[error("cannot list source directory {path:?}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nothing to review: {0}")]
    EmptyLedger(EmptyCause),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
