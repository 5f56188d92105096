//! Storage layer: the CSV ledger file.
//!
//! One header row (`data_record,keep,remove,unsure`) followed by one row per record,
//! in review order. Flags are written as `0`/`1`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const HEADER: [&str; 4] = ["data_record", "keep", "remove", "unsure"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub data_record: String,
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub keep: bool,
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub remove: bool,
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub unsure: bool,
}

pub fn read_rows(path: &Path) -> Result<Vec<LedgerRow>, StorageError> {
    let file = File::open(path)?;
    let rows = read_rows_from(file)?;
    debug!("read {} ledger rows from {:?}", rows.len(), path);
    Ok(rows)
}

pub fn read_rows_from<R: io::Read>(reader: R) -> Result<Vec<LedgerRow>, StorageError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Truncates and rewrites the whole file. Not atomic.
pub fn write_rows(path: &Path, rows: &[LedgerRow]) -> Result<(), StorageError> {
    let file = File::create(path)?;
    write_rows_to(file, rows)?;
    debug!("wrote {} ledger rows to {:?}", rows.len(), path);
    Ok(())
}

pub fn write_rows_to<W: io::Write>(writer: W, rows: &[LedgerRow]) -> Result<(), StorageError> {
    // Header is written by hand so an empty ledger still gets one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

// Older ledgers were written by a dataframe library and carry `0.0`/`1.0`.
fn read_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| D::Error::custom(format!("invalid flag value {raw:?}")))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => return Some(true),
        "false" => return Some(false),
        _ => {}
    }
    let value: f64 = raw.trim().parse().ok()?;
    if value == 0.0 {
        Some(false)
    } else if value == 1.0 {
        Some(true)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, keep: bool, remove: bool, unsure: bool) -> LedgerRow {
        LedgerRow {
            data_record: path.to_string(),
            keep,
            remove,
            unsure,
        }
    }

    #[test]
    fn writes_header_and_integer_flags() {
        let mut buf = Vec::new();
        write_rows_to(
            &mut buf,
            &[row("imgs/a.png", true, false, false), row("imgs/b.png", false, false, false)],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "data_record,keep,remove,unsure\nimgs/a.png,1,0,0\nimgs/b.png,0,0,0\n"
        );
    }

    #[test]
    fn empty_ledger_still_has_header() {
        let mut buf = Vec::new();
        write_rows_to(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "data_record,keep,remove,unsure\n");
        assert!(read_rows_from("data_record,keep,remove,unsure\n".as_bytes())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn reads_float_and_boolean_flags() {
        let input = "data_record,keep,remove,unsure\n\
                     a.png,0.0,1.0,0.0\n\
                     b.png,true,false,false\n\
                     c.png,0,0,1\n";
        let rows = read_rows_from(input.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                row("a.png", false, true, false),
                row("b.png", true, false, false),
                row("c.png", false, false, true),
            ]
        );
    }

    #[test]
    fn rejects_unknown_flag_value() {
        let input = "data_record,keep,remove,unsure\na.png,2,0,0\n";
        let err = read_rows_from(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid flag value"), "{err}");
    }

    #[test]
    fn rejects_missing_column() {
        let input = "data_record,keep,remove\na.png,0,0\n";
        assert!(read_rows_from(input.as_bytes()).is_err());
    }

    #[test]
    fn paths_with_commas_survive_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_records.csv");
        let rows = vec![
            row("shots/one, two.png", false, false, true),
            row("shots/\"quoted\".png", true, false, false),
        ];
        write_rows(&path, &rows).unwrap();
        assert_eq!(read_rows(&path).unwrap(), rows);
    }
}
