use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A decision the reviewer can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Keep,
    Remove,
    Unsure,
}

/// Derived review state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Keep,
    Remove,
    Unsure,
    Unassigned,
}

impl From<Decision> for Status {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Keep => Status::Keep,
            Decision::Remove => Status::Remove,
            Decision::Unsure => Status::Unsure,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Keep => "Keep",
            Status::Remove => "Remove",
            Status::Unsure => "Unsure",
            Status::Unassigned => "Unassigned",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Status::from(*self).fmt(f)
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" | "k" => Ok(Decision::Keep),
            "remove" | "r" => Ok(Decision::Remove),
            "unsure" | "u" => Ok(Decision::Unsure),
            other => Err(format!("unknown decision '{other}' (keep|remove|unsure)")),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unassigned" | "none" => Ok(Status::Unassigned),
            other => other
                .parse::<Decision>()
                .map(Status::from)
                .map_err(|_| format!("unknown status '{other}' (keep|remove|unsure|unassigned)")),
        }
    }
}

/// One reviewable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub path: String,
    pub keep: bool,
    pub remove: bool,
    pub unsure: bool,
}

impl Record {
    pub fn unassigned(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            keep: false,
            remove: false,
            unsure: false,
        }
    }

    /// First set flag wins, checked as keep, remove, unsure.
    pub fn status(&self) -> Status {
        if self.keep {
            Status::Keep
        } else if self.remove {
            Status::Remove
        } else if self.unsure {
            Status::Unsure
        } else {
            Status::Unassigned
        }
    }

    pub fn set_status(&mut self, decision: Decision) {
        self.keep = decision == Decision::Keep;
        self.remove = decision == Decision::Remove;
        self.unsure = decision == Decision::Unsure;
    }

    pub fn is_unassigned(&self) -> bool {
        self.status() == Status::Unassigned
    }

    /// True when more than one flag is set. Only reachable through a hand-edited file.
    pub fn has_conflicting_flags(&self) -> bool {
        [self.keep, self.remove, self.unsure]
            .iter()
            .filter(|f| **f)
            .count()
            > 1
    }

    /// File name portion of the path, for headings.
    pub fn file_name(&self) -> &str {
        std::path::Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

impl From<storage::LedgerRow> for Record {
    fn from(row: storage::LedgerRow) -> Self {
        Self {
            path: row.data_record,
            keep: row.keep,
            remove: row.remove,
            unsure: row.unsure,
        }
    }
}

impl From<&Record> for storage::LedgerRow {
    fn from(r: &Record) -> Self {
        Self {
            data_record: r.path.clone(),
            keep: r.keep,
            remove: r.remove,
            unsure: r.unsure,
        }
    }
}
