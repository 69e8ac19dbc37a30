//! Period windows over dated records

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Dated;

/// Which slice of history a computation looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PeriodMode {
    /// `[today - n, today]`, both ends inclusive
    TrailingDays { days: u32 },
    /// Explicit inclusive range; bounds may arrive in either order
    Range { start: NaiveDate, end: NaiveDate },
}

impl Default for PeriodMode {
    fn default() -> Self {
        Self::TrailingDays { days: 7 }
    }
}

impl PeriodMode {
    pub fn week() -> Self {
        Self::TrailingDays { days: 7 }
    }

    pub fn month() -> Self {
        Self::TrailingDays { days: 30 }
    }

    pub fn year() -> Self {
        Self::TrailingDays { days: 365 }
    }

    /// Resolve a preset name (`week`, `month`, `year`) or a custom range.
    ///
    /// A complete `from`/`to` pair wins over the preset.
    pub fn parse(period: &str, from: Option<&str>, to: Option<&str>) -> Result<Self> {
        match (from, to) {
            (Some(from), Some(to)) => {
                let start = parse_bound(from, "from")?;
                let end = parse_bound(to, "to")?;
                return Ok(Self::Range { start, end });
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::InvalidData(
                    "custom range needs both --from and --to".to_string(),
                ));
            }
            (None, None) => {}
        }

        match period.trim().to_lowercase().as_str() {
            "week" | "7d" => Ok(Self::week()),
            "month" | "30d" => Ok(Self::month()),
            "year" | "365d" => Ok(Self::year()),
            other => Err(Error::InvalidData(format!(
                "Unknown period: {}. Available: week, month, year",
                other
            ))),
        }
    }

    /// Inclusive `(start, end)` for the given reference day
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Self::TrailingDays { days } => {
                let start = today
                    .checked_sub_signed(Duration::days(i64::from(days)))
                    .unwrap_or(NaiveDate::MIN);
                (start, today)
            }
            Self::Range { start, end } if start > end => (end, start),
            Self::Range { start, end } => (start, end),
        }
    }

    pub fn contains(&self, day: NaiveDate, today: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        day >= start && day <= end
    }

    /// Number of calendar days covered, counting both ends
    pub fn span_days(&self, today: NaiveDate) -> i64 {
        let (start, end) = self.bounds(today);
        (end - start).num_days() + 1
    }

    pub fn label(&self) -> String {
        match *self {
            Self::TrailingDays { days: 7 } => "week".to_string(),
            Self::TrailingDays { days: 30 } => "month".to_string(),
            Self::TrailingDays { days: 365 } => "year".to_string(),
            Self::TrailingDays { days } => format!("last {} days", days),
            Self::Range { .. } => {
                let (start, end) = self.bounds(NaiveDate::MIN);
                format!("{} to {}", start, end)
            }
        }
    }
}

fn parse_bound(value: &str, name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidData(format!("Invalid --{} date '{}' (use YYYY-MM-DD)", name, value))
    })
}

/// Records inside the window, ordered by date ascending.
///
/// Records without a usable date are dropped. Equal dates keep their input
/// order.
pub fn filter_period<R: Dated + Clone>(
    records: &[R],
    mode: PeriodMode,
    today: NaiveDate,
) -> Vec<R> {
    let mut kept: Vec<(NaiveDate, R)> = records
        .iter()
        .filter_map(|r| r.date().map(|d| (d, r)))
        .filter(|(d, _)| mode.contains(*d, today))
        .map(|(d, r)| (d, r.clone()))
        .collect();
    kept.sort_by_key(|(d, _)| *d);
    kept.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        date: Option<NaiveDate>,
        tag: &'static str,
    }

    impl Dated for Entry {
        fn date(&self) -> Option<NaiveDate> {
            self.date
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(date: NaiveDate, tag: &'static str) -> Entry {
        Entry {
            date: Some(date),
            tag,
        }
    }

    #[test]
    fn test_trailing_window_edges() {
        let today = day(2024, 5, 20);
        let records = vec![
            entry(today - Duration::days(8), "outside"),
            entry(today - Duration::days(7), "edge"),
            entry(today, "today"),
        ];
        let kept = filter_period(&records, PeriodMode::week(), today);
        let tags: Vec<_> = kept.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["edge", "today"]);
    }

    #[test]
    fn test_huge_trailing_window_clamps_to_min_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mode = PeriodMode::TrailingDays { days: u32::MAX };
        assert_eq!(mode.bounds(today), (NaiveDate::MIN, today));

        let records = vec![
            Entry { date: Some(today), tag: "now" },
            Entry { date: NaiveDate::from_ymd_opt(1900, 1, 1), tag: "old" },
        ];
        let kept = filter_period(&records, mode, today);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].tag, "old");
    }

    #[test]
    fn test_range_bounds_swapped() {
        let today = day(2024, 5, 20);
        let mode = PeriodMode::Range {
            start: day(2024, 5, 10),
            end: day(2024, 5, 1),
        };
        let records = vec![
            entry(day(2024, 5, 1), "start"),
            entry(day(2024, 5, 10), "end"),
            entry(day(2024, 5, 11), "after"),
        ];
        let kept = filter_period(&records, mode, today);
        assert_eq!(kept.len(), 2);
        assert_eq!(mode.span_days(today), 10);
    }

    #[test]
    fn test_output_sorted_and_stable() {
        let today = day(2024, 5, 20);
        let records = vec![
            entry(day(2024, 5, 19), "b1"),
            entry(day(2024, 5, 18), "a"),
            entry(day(2024, 5, 19), "b2"),
        ];
        let kept = filter_period(&records, PeriodMode::week(), today);
        let tags: Vec<_> = kept.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["a", "b1", "b2"]);
        // Input untouched
        assert_eq!(records[0].tag, "b1");
    }

    #[test]
    fn test_undated_records_excluded() {
        let today = day(2024, 5, 20);
        let records = vec![
            Entry {
                date: None,
                tag: "none",
            },
            entry(today, "today"),
        ];
        assert_eq!(filter_period(&records, PeriodMode::year(), today).len(), 1);
    }

    #[test]
    fn test_parse_presets_and_range() {
        assert_eq!(PeriodMode::parse("week", None, None).unwrap(), PeriodMode::week());
        assert_eq!(PeriodMode::parse("Month", None, None).unwrap(), PeriodMode::month());
        assert_eq!(PeriodMode::parse("year", None, None).unwrap(), PeriodMode::year());
        assert!(PeriodMode::parse("decade", None, None).is_err());

        let range = PeriodMode::parse("week", Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(
            range,
            PeriodMode::Range {
                start: day(2024, 1, 1),
                end: day(2024, 1, 31)
            }
        );
        assert!(PeriodMode::parse("week", Some("2024-01-01"), None).is_err());
        assert!(PeriodMode::parse("week", Some("01/01/2024"), Some("2024-01-31")).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PeriodMode::month().label(), "month");
        assert_eq!(PeriodMode::TrailingDays { days: 14 }.label(), "last 14 days");
        let range = PeriodMode::Range {
            start: day(2024, 2, 1),
            end: day(2024, 1, 1),
        };
        assert_eq!(range.label(), "2024-01-01 to 2024-02-01");
    }
}
