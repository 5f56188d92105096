//! Public library modules for the CLI crate
pub mod console;
pub mod presenter;
pub mod review;
