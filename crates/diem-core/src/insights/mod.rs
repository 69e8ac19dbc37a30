//! Rule-based insights
//!
//! Period averages of sleep, study, mood and water are checked against a
//! fixed table of thresholds. Each matching rule yields one advisory message.
//!
//! ```rust,ignore
//! use diem_core::insights::{generate_insights, MetricAverages};
//!
//! let insights = generate_insights(&MetricAverages {
//!     sleep: Some(5.5),
//!     study: Some(4.0),
//!     ..Default::default()
//! });
//! ```

mod rules;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use rules::{Rule, RULES};

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Positive or neutral observation
    Info,
    /// Worth adjusting
    Attention,
    /// Pattern that is likely hurting you
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Attention => 2,
            Severity::Warning => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "attention" => Ok(Severity::Attention),
            "warning" => Ok(Severity::Warning),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Period averages; `None` when the period has no data for a metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    pub sleep: Option<f64>,
    pub study: Option<f64>,
    pub mood: Option<f64>,
    pub water: Option<f64>,
}

impl MetricAverages {
    pub fn is_empty(&self) -> bool {
        self.sleep.is_none() && self.study.is_none() && self.mood.is_none() && self.water.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable rule identifier
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(rule: &str, severity: Severity, message: &str) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.to_string(),
        }
    }
}

/// Evaluate the rule table against period averages.
///
/// Never returns an empty list: a period without data yields a single
/// "no data" insight, and a period where nothing fires yields a single
/// "keep tracking" insight.
pub fn generate_insights(averages: &MetricAverages) -> Vec<Insight> {
    if averages.is_empty() {
        let (rule, message) = rules::NO_DATA;
        return vec![Insight::new(rule, Severity::Info, message)];
    }

    let mut insights: Vec<Insight> = RULES
        .iter()
        .filter(|rule| (rule.check)(averages).unwrap_or(false))
        .map(|rule| Insight::new(rule.id, rule.severity, rule.message))
        .collect();

    if insights.is_empty() {
        let (rule, message) = rules::KEEP_TRACKING;
        insights.push(Insight::new(rule, Severity::Info, message));
    }

    tracing::debug!(count = insights.len(), "Generated insights");
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.rule.as_str()).collect()
    }

    fn all(sleep: f64, study: f64, mood: f64, water: f64) -> MetricAverages {
        MetricAverages {
            sleep: Some(sleep),
            study: Some(study),
            mood: Some(mood),
            water: Some(water),
        }
    }

    #[test]
    fn test_no_data_single_insight() {
        let insights = generate_insights(&MetricAverages::default());
        assert_eq!(ids(&insights), vec!["no_data"]);
    }

    #[test]
    fn test_short_sleep_with_study_fires_in_table_order() {
        let averages = MetricAverages {
            sleep: Some(5.0),
            study: Some(4.0),
            ..Default::default()
        };
        let insights = generate_insights(&averages);
        assert_eq!(ids(&insights), vec!["study_without_sleep", "short_sleep"]);
        assert_eq!(insights[0].severity, Severity::Warning);
    }

    #[test]
    fn test_nothing_fires_keeps_tracking() {
        // sleep 6.5, study 3, mood 6, water 6 sit between every threshold
        let insights = generate_insights(&all(6.5, 3.0, 6.0, 6.0));
        assert_eq!(ids(&insights), vec!["keep_tracking"]);
    }

    #[test]
    fn test_perfect_balance() {
        let insights = generate_insights(&all(8.5, 3.5, 8.5, 8.0));
        assert_eq!(
            ids(&insights),
            vec![
                "rested_and_happy",
                "ideal_sleep",
                "good_hydration",
                "great_mood",
                "perfect_balance"
            ]
        );
    }

    #[test]
    fn test_absent_metric_rules_do_not_fire() {
        let averages = MetricAverages {
            water: Some(3.0),
            ..Default::default()
        };
        assert_eq!(ids(&generate_insights(&averages)), vec!["low_water"]);
    }

    #[test]
    fn test_threshold_edges() {
        // Ideal sleep is inclusive at both ends
        assert!(ids(&generate_insights(&all(7.0, 3.0, 6.0, 6.0))).contains(&"ideal_sleep"));
        assert!(ids(&generate_insights(&all(9.0, 3.0, 6.0, 6.0))).contains(&"ideal_sleep"));
        // Strict comparisons stay quiet on the boundary
        let edge = generate_insights(&all(6.0, 2.0, 5.0, 5.0));
        assert_eq!(ids(&edge), vec!["keep_tracking"]);
    }

    #[test]
    fn test_deterministic() {
        let averages = all(5.0, 5.0, 4.0, 2.0);
        assert_eq!(generate_insights(&averages), generate_insights(&averages));
    }

    #[test]
    fn test_severity_names() {
        assert_eq!("attention".parse::<Severity>().unwrap(), Severity::Attention);
        assert!(Severity::Warning.priority() > Severity::Info.priority());
        assert!("alert".parse::<Severity>().is_err());
    }
}
