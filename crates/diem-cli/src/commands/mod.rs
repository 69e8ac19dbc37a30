//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init, status, audit and shared utilities (open_db, dates)
//! - `export` - Finance CSV, full JSON export and import
//! - `habits` - Habit list, add, toggle, delete
//! - `log` - Logging, listing and deleting tracker entries
//! - `prefs` - Theme and tracker enablement
//! - `serve` - Web server command
//! - `stats` - Dashboard, streaks, finance and overview reports

pub mod core;
pub mod export;
pub mod habits;
pub mod log;
pub mod prefs;
pub mod serve;
pub mod stats;

// Re-export command functions for main.rs
pub use self::core::*;
pub use export::*;
pub use habits::*;
pub use log::*;
pub use prefs::*;
pub use serve::*;
pub use stats::*;
