//! Cursor movement over a ledger. Pure functions of index and length.

use crate::error::{EmptyCause, LedgerError, Result};
use crate::ledger::Ledger;

/// Outcome of a forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    /// Already on the last record; the cursor stays put.
    EndOfLedger(usize),
}

impl Step {
    pub fn index(self) -> usize {
        match self {
            Step::Moved(i) | Step::EndOfLedger(i) => i,
        }
    }
}

/// Index of the first unassigned record.
pub fn init(ledger: &Ledger) -> Result<usize> {
    if ledger.is_empty() {
        return Err(LedgerError::EmptyLedger(EmptyCause::NoRecords));
    }
    ledger
        .first_unassigned()
        .ok_or(LedgerError::EmptyLedger(EmptyCause::AllReviewed))
}

/// Steps forward, clamped to the last record. An index already past the end is pulled
/// back to `len - 1`.
pub fn next(index: usize, len: usize) -> Result<Step> {
    if len == 0 {
        return Err(LedgerError::EmptyLedger(EmptyCause::NoRecords));
    }
    let last = len - 1;
    if index >= last {
        Ok(Step::EndOfLedger(last))
    } else {
        Ok(Step::Moved(index + 1))
    }
}

pub fn previous(index: usize) -> usize {
    index.saturating_sub(1)
}

/// Validates a direct jump.
pub fn jump(index: usize, len: usize) -> Result<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(LedgerError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;

    #[test]
    fn init_finds_first_unassigned() {
        let mut ledger = Ledger::from_paths(["a", "b", "c", "d"]);
        ledger.set_status(0, Decision::Keep).unwrap();
        ledger.set_status(1, Decision::Remove).unwrap();
        ledger.set_status(3, Decision::Keep).unwrap();
        assert_eq!(init(&ledger).unwrap(), 2);
    }

    #[test]
    fn init_on_fresh_ledger_is_zero() {
        assert_eq!(init(&Ledger::from_paths(["a.png", "b.png"])).unwrap(), 0);
    }

    #[test]
    fn init_reports_why_nothing_is_left() {
        assert!(matches!(
            init(&Ledger::default()),
            Err(LedgerError::EmptyLedger(EmptyCause::NoRecords))
        ));
        let mut done = Ledger::from_paths(["a"]);
        done.set_status(0, Decision::Unsure).unwrap();
        assert!(matches!(
            init(&done),
            Err(LedgerError::EmptyLedger(EmptyCause::AllReviewed))
        ));
    }

    #[test]
    fn next_at_last_record_surfaces_end_of_ledger() {
        assert_eq!(next(2, 3).unwrap(), Step::EndOfLedger(2));
        assert_eq!(next(1, 3).unwrap(), Step::Moved(2));
        assert_eq!(next(7, 3).unwrap(), Step::EndOfLedger(2));
        assert!(next(0, 0).is_err());
    }

    #[test]
    fn previous_stops_at_zero() {
        assert_eq!(previous(0), 0);
        assert_eq!(previous(4), 3);
    }

    #[test]
    fn jump_rejects_out_of_range() {
        assert_eq!(jump(1, 2).unwrap(), 1);
        assert!(matches!(
            jump(2, 2),
            Err(LedgerError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }
}
