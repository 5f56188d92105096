//! Lists the source directory once, at ledger creation.

use crate::error::{LedgerError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Every direct entry of `root`, sorted by file name. No extension filter and no
/// recursion: sub-directories become entries like any file. Entries that are unreadable
/// or whose name is not valid UTF-8 are logged and skipped.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source: io::Error| LedgerError::SourceUnreadable {
        path: root.to_path_buf(),
        source,
    };

    let meta = fs::metadata(root).map_err(unreadable)?;
    if !meta.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::Other,
            "not a directory",
        )));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(unreadable(e.into())),
            Err(e) => {
                warn!("skipping unreadable entry in {:?}: {}", root, e);
                continue;
            }
        };
        // Ledger paths are text; a lossy name would point at no file.
        if entry.path().to_str().is_none() {
            warn!("skipping non UTF-8 entry name {:?}", entry.path());
            continue;
        }
        items.push(entry.path().to_path_buf());
    }
    Ok(items)
}
