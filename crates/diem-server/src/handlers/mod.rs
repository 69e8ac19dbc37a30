//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod entries;
pub mod export;
pub mod habits;
pub mod preferences;
pub mod stats;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use entries::*;
pub use export::*;
pub use habits::*;
pub use preferences::*;
pub use stats::*;
