//! Statistics over tracker history
//!
//! Pure functions over in-memory record collections:
//!
//! - **streak** - current and longest run of consecutive days
//! - **period** - trailing-day windows and explicit ranges
//! - **aggregate** - sums, averages, category breakdowns

pub mod aggregate;
pub mod period;
pub mod streak;

pub use aggregate::{
    aggregate, breakdown, group_by_category, percentage_of, round1, CategoryShare, FieldAggregate,
    Measured,
};
pub use period::{filter_period, PeriodMode};
pub use streak::{compute_streaks, current_streak, longest_streak, streaks_for, StreakSummary};
