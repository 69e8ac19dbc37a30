//! The fixed rule table
//!
//! Rules are evaluated in declaration order and each fires independently.

use super::{MetricAverages, Severity};

pub struct Rule {
    pub id: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    /// `None` when a metric the rule needs is absent
    pub check: fn(&MetricAverages) -> Option<bool>,
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "study_without_sleep",
        severity: Severity::Warning,
        message: "You are studying hard but not sleeping enough. More rest is recommended.",
        check: |m| Some(m.sleep? < 6.0 && m.study? > 3.0),
    },
    Rule {
        id: "rested_and_happy",
        severity: Severity::Info,
        message: "You are at your most productive when well rested. Keep it up!",
        check: |m| Some(m.sleep? > 8.0 && m.mood? > 7.0),
    },
    Rule {
        id: "short_sleep",
        severity: Severity::Warning,
        message: "Average sleep is under 6 hours. Try to sleep at least 7-8 hours.",
        check: |m| Some(m.sleep? < 6.0),
    },
    Rule {
        id: "ideal_sleep",
        severity: Severity::Info,
        message: "Great sleep rhythm! That is the ideal number of hours.",
        check: |m| Some((7.0..=9.0).contains(&m.sleep?)),
    },
    Rule {
        id: "low_water",
        severity: Severity::Attention,
        message: "Drink more water! At least 6-8 glasses a day is recommended.",
        check: |m| Some(m.water? < 5.0),
    },
    Rule {
        id: "good_hydration",
        severity: Severity::Info,
        message: "Great hydration! Keep drinking enough water.",
        check: |m| Some(m.water? >= 7.0),
    },
    Rule {
        id: "heavy_study",
        severity: Severity::Attention,
        message: "You spend a lot of time studying. Do not forget to take breaks!",
        check: |m| Some(m.study? > 4.0),
    },
    Rule {
        id: "light_study",
        severity: Severity::Attention,
        message: "More study time might help you get better results.",
        check: |m| Some(m.study? < 2.0),
    },
    Rule {
        id: "low_mood",
        severity: Severity::Warning,
        message: "Your mood has been lower. Look for activities that make you happy.",
        check: |m| Some(m.mood? < 5.0),
    },
    Rule {
        id: "great_mood",
        severity: Severity::Info,
        message: "Excellent mood! Keep up the positive habits.",
        check: |m| Some(m.mood? >= 8.0),
    },
    Rule {
        id: "perfect_balance",
        severity: Severity::Info,
        message: "Perfect balance! Sleep, study and mood are all excellent.",
        check: |m| Some(m.sleep? > 7.0 && m.study? > 3.0 && m.mood? > 7.0),
    },
];

pub const NO_DATA: (&str, &str) = ("no_data", "No data for the selected period.");

pub const KEEP_TRACKING: (&str, &str) = (
    "keep_tracking",
    "Keep tracking your habits for better insights.",
);
