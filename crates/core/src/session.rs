//! A review session: the ledger, its store, and the cursor, driven by explicit command
//! handlers. Observers are told about every change and re-render from the view they get.

use crate::error::{EmptyCause, LedgerError, Result};
use crate::ledger::{Ledger, LedgerStore, Summary};
use crate::models::{Decision, Record, Status};
use crate::navigator::{self, Step};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Explicit redraw request, e.g. right after subscribing.
    Refreshed,
    StatusChanged {
        index: usize,
        before: Status,
        after: Status,
    },
    Moved {
        from: usize,
        to: usize,
    },
    EndOfLedger {
        index: usize,
    },
    Saved {
        path: PathBuf,
        records: usize,
    },
}

/// Read-only state handed to observers alongside each event.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub ledger: &'a Ledger,
    pub cursor: usize,
    pub dirty: bool,
    pub last_saved: Option<DateTime<Local>>,
}

impl<'a> SessionView<'a> {
    pub fn current(&self) -> Option<&'a Record> {
        self.ledger.records().get(self.cursor)
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary()
    }
}

pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent, view: &SessionView<'_>);
}

pub struct Session {
    store: LedgerStore,
    ledger: Ledger,
    cursor: usize,
    dirty: bool,
    last_saved: Option<DateTime<Local>>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl Session {
    /// Initializes (or loads) the ledger and places the cursor on the first unassigned
    /// record.
    pub fn open(store: LedgerStore, source_dir: &Path) -> Result<Self> {
        let ledger = store.initialize(source_dir)?;
        let cursor = navigator::init(&ledger)?;
        Ok(Self::assemble(store, ledger, cursor))
    }

    /// Like [`Session::open`] but starts at `index`, which also works on a fully reviewed
    /// ledger.
    pub fn open_at(store: LedgerStore, source_dir: &Path, index: usize) -> Result<Self> {
        let ledger = store.initialize(source_dir)?;
        Self::with_ledger(store, ledger, index)
    }

    pub fn with_ledger(store: LedgerStore, ledger: Ledger, cursor: usize) -> Result<Self> {
        if ledger.is_empty() {
            return Err(LedgerError::EmptyLedger(EmptyCause::NoRecords));
        }
        let cursor = navigator::jump(cursor, ledger.len())?;
        Ok(Self::assemble(store, ledger, cursor))
    }

    fn assemble(store: LedgerStore, ledger: Ledger, cursor: usize) -> Self {
        Self {
            store,
            ledger,
            cursor,
            dirty: false,
            last_saved: None,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Record {
        // The constructors and every handler keep the cursor in range.
        &self.ledger.records()[self.cursor]
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            ledger: &self.ledger,
            cursor: self.cursor,
            dirty: self.dirty,
            last_saved: self.last_saved,
        }
    }

    pub fn refresh(&mut self) {
        self.notify(SessionEvent::Refreshed);
    }

    /// Records a decision for the record under the cursor.
    pub fn on_decision(&mut self, decision: Decision) -> Result<Status> {
        let index = self.cursor;
        let before = self.ledger.set_status(index, decision)?;
        let after = Status::from(decision);
        if before != after {
            self.dirty = true;
        }
        self.notify(SessionEvent::StatusChanged {
            index,
            before,
            after,
        });
        Ok(before)
    }

    pub fn on_next(&mut self) -> Result<Step> {
        let from = self.cursor;
        let step = navigator::next(from, self.ledger.len())?;
        self.cursor = step.index();
        match step {
            Step::Moved(to) => self.notify(SessionEvent::Moved { from, to }),
            Step::EndOfLedger(index) => {
                debug!("end of ledger at {}", index);
                self.notify(SessionEvent::EndOfLedger { index })
            }
        }
        Ok(step)
    }

    pub fn on_previous(&mut self) -> usize {
        let from = self.cursor;
        self.cursor = navigator::previous(from);
        self.notify(SessionEvent::Moved {
            from,
            to: self.cursor,
        });
        self.cursor
    }

    pub fn on_jump(&mut self, index: usize) -> Result<usize> {
        let from = self.cursor;
        self.cursor = navigator::jump(index, self.ledger.len())?;
        self.notify(SessionEvent::Moved {
            from,
            to: self.cursor,
        });
        Ok(self.cursor)
    }

    /// Writes the whole ledger. On failure the in-memory ledger stays dirty.
    pub fn on_save(&mut self) -> Result<()> {
        self.store.save(&self.ledger)?;
        self.dirty = false;
        self.last_saved = Some(Local::now());
        let event = SessionEvent::Saved {
            path: self.store.path().to_path_buf(),
            records: self.ledger.len(),
        };
        self.notify(event);
        Ok(())
    }

    fn notify(&mut self, event: SessionEvent) {
        let view = SessionView {
            ledger: &self.ledger,
            cursor: self.cursor,
            dirty: self.dirty,
            last_saved: self.last_saved,
        };
        for observer in self.observers.iter_mut() {
            observer.on_event(&event, &view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(SessionEvent, usize)>>>);

    impl SessionObserver for Recorder {
        fn on_event(&mut self, event: &SessionEvent, view: &SessionView<'_>) {
            self.0.borrow_mut().push((event.clone(), view.cursor));
        }
    }

    fn fixture(names: &[&str]) -> (tempfile::TempDir, LedgerStore, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        for n in names {
            fs::write(images.join(n), b"x").unwrap();
        }
        let store = LedgerStore::new(dir.path().join("cache").join("data_records.csv"));
        (dir, store, images)
    }

    #[test]
    fn fresh_start_opens_on_first_record() {
        let (_dir, store, images) = fixture(&["a.png", "b.png"]);
        let session = Session::open(store, &images).unwrap();
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().summary().unassigned, 2);
        assert_eq!(session.cursor(), 0);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn empty_directory_is_surfaced() {
        let (_dir, store, images) = fixture(&[]);
        let err = Session::open(store.clone(), &images).err().unwrap();
        assert!(matches!(err, LedgerError::EmptyLedger(EmptyCause::NoRecords)));
        // The snapshot is still written so the next run loads rather than rescans.
        assert!(store.exists());
    }

    #[test]
    fn decisions_notify_observers_and_mark_dirty() {
        let (_dir, store, images) = fixture(&["a.png", "b.png", "c.png"]);
        let mut session = Session::open(store, &images).unwrap();
        let recorder = Recorder::default();
        session.subscribe(Box::new(recorder.clone()));

        session.on_decision(Decision::Keep).unwrap();
        session.on_decision(Decision::Remove).unwrap();
        assert!(session.has_unsaved_changes());
        let r = session.current();
        assert!(r.remove && !r.keep && !r.unsure);

        let events = recorder.0.borrow();
        assert_eq!(
            events[1].0,
            SessionEvent::StatusChanged {
                index: 0,
                before: Status::Keep,
                after: Status::Remove
            }
        );
    }

    #[test]
    fn next_on_last_record_stays_put() {
        let (_dir, store, images) = fixture(&["a.png", "b.png", "c.png"]);
        let mut session = Session::open_at(store, &images, 2).unwrap();
        let recorder = Recorder::default();
        session.subscribe(Box::new(recorder.clone()));

        assert_eq!(session.on_next().unwrap(), Step::EndOfLedger(2));
        assert_eq!(session.cursor(), 2);
        assert_eq!(
            recorder.0.borrow().last().unwrap().0,
            SessionEvent::EndOfLedger { index: 2 }
        );
    }

    #[test]
    fn previous_and_jump_move_the_cursor() {
        let (_dir, store, images) = fixture(&["a.png", "b.png", "c.png"]);
        let mut session = Session::open(store, &images).unwrap();
        assert_eq!(session.on_previous(), 0);
        assert_eq!(session.on_jump(2).unwrap(), 2);
        assert_eq!(session.on_previous(), 1);
        assert!(session.on_jump(3).is_err());
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn save_persists_and_clears_dirty() {
        let (_dir, store, images) = fixture(&["a.png", "b.png"]);
        let mut session = Session::open(store.clone(), &images).unwrap();
        session.on_decision(Decision::Unsure).unwrap();
        assert!(session.view().dirty);
        session.on_save().unwrap();
        assert!(!session.has_unsaved_changes());
        assert!(session.view().last_saved.is_some());

        let reopened = Session::open(store, &images).unwrap();
        assert_eq!(reopened.ledger().status_of(0).unwrap(), Status::Unsure);
        assert_eq!(reopened.cursor(), 1);
    }

    #[test]
    fn repeating_a_decision_does_not_dirty_the_session() {
        let (_dir, store, images) = fixture(&["a.png"]);
        let mut session = Session::open(store, &images).unwrap();
        session.on_decision(Decision::Keep).unwrap();
        session.on_save().unwrap();
        session.on_decision(Decision::Keep).unwrap();
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn fully_reviewed_ledger_needs_an_explicit_start() {
        let (_dir, store, images) = fixture(&["a.png"]);
        let mut session = Session::open(store.clone(), &images).unwrap();
        session.on_decision(Decision::Keep).unwrap();
        session.on_save().unwrap();

        assert!(matches!(
            Session::open(store.clone(), &images).err().unwrap(),
            LedgerError::EmptyLedger(EmptyCause::AllReviewed)
        ));
        let session = Session::open_at(store, &images, 0).unwrap();
        assert_eq!(session.current().status(), Status::Keep);
    }
}
