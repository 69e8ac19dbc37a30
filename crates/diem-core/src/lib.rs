//! Diem Core Library
//!
//! Shared functionality for the Diem personal life tracker:
//! - Tracker entry models with lenient date decoding and validation
//! - Streak, period and aggregate statistics
//! - Rule-based insights over period averages
//! - Dashboard and overview composites
//! - Per-user record store backed by SQLite (SQLCipher)
//! - Preferences (theme, enabled trackers) from TOML
//! - Finance CSV and full JSON export/import

pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod preferences;
pub mod stats;
pub mod store;

pub use dashboard::{
    build_overview, compute_dashboard_stats, compute_finance_summary, daily_samples,
    ActivityBreakdown, DashboardStats, FinanceSummary, TrackerOverview,
};
pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use export::{export_finance_csv, export_full, import_full, FullExport, ImportStats};
pub use insights::{generate_insights, Insight, MetricAverages, Severity};
pub use models::{Dated, TrackerKind, TrackerRecord, TrackerSnapshot};
pub use preferences::{Preferences, Theme};
pub use stats::{PeriodMode, StreakSummary};
pub use store::{RecordStore, Stored};
