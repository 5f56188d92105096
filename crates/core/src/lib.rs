//! Core library: ledger bookkeeping, navigation, and review sessions.

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod navigator;
pub mod scanner;
pub mod session;
pub mod window;

pub use error::{EmptyCause, LedgerError};
pub use ledger::{Ledger, LedgerStore, Summary};
pub use models::{Decision, Record, Status};
pub use navigator::Step;
pub use session::{Session, SessionEvent, SessionObserver, SessionView};
