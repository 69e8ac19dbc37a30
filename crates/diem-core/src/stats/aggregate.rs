//! Sums, averages and category breakdowns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Records that expose named numeric measures
pub trait Measured {
    /// Value of `field`, or `None` when the record does not carry it
    fn measure(&self, field: &str) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAggregate {
    pub sum: f64,
    pub average: f64,
    /// Records that carried the measure
    pub count: usize,
}

impl FieldAggregate {
    fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        Self {
            sum,
            average: if count > 0 { sum / count as f64 } else { 0.0 },
            count,
        }
    }

    /// Average when at least one record carried the measure
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.average)
    }
}

/// Aggregate each requested field over the records.
///
/// Every requested field appears in the result, with zeros when no record
/// carries it.
pub fn aggregate<R: Measured>(records: &[R], fields: &[&str]) -> BTreeMap<String, FieldAggregate> {
    fields
        .iter()
        .map(|field| {
            let agg = FieldAggregate::from_values(records.iter().filter_map(|r| r.measure(field)));
            (field.to_string(), agg)
        })
        .collect()
}

/// Sum `value_fn` per label returned by `category_fn`
pub fn group_by_category<R, C, V>(records: &[R], category_fn: C, value_fn: V) -> BTreeMap<String, f64>
where
    C: Fn(&R) -> String,
    V: Fn(&R) -> f64,
{
    let mut groups = BTreeMap::new();
    for record in records {
        *groups.entry(category_fn(record)).or_insert(0.0) += value_fn(record);
    }
    groups
}

/// `part` as a percentage of `total`; 0 when there is no total
pub fn percentage_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Turn grouped sums into shares, largest first
pub fn breakdown(groups: &BTreeMap<String, f64>) -> Vec<CategoryShare> {
    let total: f64 = groups.values().sum();
    let mut shares: Vec<CategoryShare> = groups
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: category.clone(),
            amount: *amount,
            percentage: percentage_of(*amount, total),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        hours: Option<f64>,
        label: &'static str,
    }

    impl Measured for Sample {
        fn measure(&self, field: &str) -> Option<f64> {
            match field {
                "hours" => self.hours,
                _ => None,
            }
        }
    }

    fn sample(hours: Option<f64>, label: &'static str) -> Sample {
        Sample { hours, label }
    }

    #[test]
    fn test_empty_input_yields_zero_aggregate() {
        let result = aggregate::<Sample>(&[], &["hours"]);
        assert_eq!(result["hours"], FieldAggregate::default());
        assert_eq!(result["hours"].mean(), None);
    }

    #[test]
    fn test_average_counts_only_records_with_measure() {
        let records = vec![sample(Some(6.0), "a"), sample(None, "b"), sample(Some(8.0), "c")];
        let result = aggregate(&records, &["hours", "missing"]);
        assert_eq!(
            result["hours"],
            FieldAggregate {
                sum: 14.0,
                average: 7.0,
                count: 2
            }
        );
        assert_eq!(result["missing"].count, 0);
        assert_eq!(result["missing"].average, 0.0);
    }

    #[test]
    fn test_group_by_category_sums() {
        let records = vec![
            sample(Some(2.0), "math"),
            sample(Some(1.5), "art"),
            sample(Some(3.0), "math"),
        ];
        let groups = group_by_category(&records, |s| s.label.to_string(), |s| s.hours.unwrap_or(0.0));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["math"], 5.0);
        assert_eq!(groups["art"], 1.5);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
        assert_eq!(percentage_of(5.0, -1.0), 0.0);
        assert_eq!(percentage_of(25.0, 100.0), 25.0);
    }

    #[test]
    fn test_breakdown_sorted_by_amount() {
        let mut groups = BTreeMap::new();
        groups.insert("Food".to_string(), 60.0);
        groups.insert("Bills".to_string(), 20.0);
        groups.insert("Transport".to_string(), 20.0);

        let shares = breakdown(&groups);
        let names: Vec<_> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Bills", "Transport"]);
        assert_eq!(shares[0].percentage, 60.0);
        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_of_zero_amounts() {
        let mut groups = BTreeMap::new();
        groups.insert("Other".to_string(), 0.0);
        assert_eq!(breakdown(&groups)[0].percentage, 0.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.25), 7.3);
        assert_eq!(round1(6.0), 6.0);
        assert_eq!(round1(6.04), 6.0);
    }
}
