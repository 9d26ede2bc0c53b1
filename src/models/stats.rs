// src/models/stats.rs

//! Aggregate statistics types serialized into reports.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::RoleCategory;

/// Descriptive statistics over one set of listings.
///
/// Salary fields cover only listings with a derived average salary and
/// are zero when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub total_listings: usize,
    pub with_salary: usize,
    pub unique_employers: usize,
    pub mean_salary: f64,
    pub median_salary: f64,
    pub std_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub q25_salary: f64,
    pub q75_salary: f64,
}

impl SnapshotStats {
    /// Value of one metric as a float.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalListings => self.total_listings as f64,
            Metric::WithSalary => self.with_salary as f64,
            Metric::UniqueEmployers => self.unique_employers as f64,
            Metric::MeanSalary => self.mean_salary,
            Metric::MedianSalary => self.median_salary,
            Metric::StdSalary => self.std_salary,
            Metric::MinSalary => self.min_salary,
            Metric::MaxSalary => self.max_salary,
            Metric::Q25Salary => self.q25_salary,
            Metric::Q75Salary => self.q75_salary,
        }
    }
}

/// Statistic compared between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalListings,
    WithSalary,
    UniqueEmployers,
    MeanSalary,
    MedianSalary,
    StdSalary,
    MinSalary,
    MaxSalary,
    Q25Salary,
    Q75Salary,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::TotalListings,
        Metric::WithSalary,
        Metric::UniqueEmployers,
        Metric::MeanSalary,
        Metric::MedianSalary,
        Metric::StdSalary,
        Metric::MinSalary,
        Metric::MaxSalary,
        Metric::Q25Salary,
        Metric::Q75Salary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TotalListings => "total_listings",
            Metric::WithSalary => "with_salary",
            Metric::UniqueEmployers => "unique_employers",
            Metric::MeanSalary => "mean_salary",
            Metric::MedianSalary => "median_salary",
            Metric::StdSalary => "std_salary",
            Metric::MinSalary => "min_salary",
            Metric::MaxSalary => "max_salary",
            Metric::Q25Salary => "q25_salary",
            Metric::Q75Salary => "q75_salary",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change of one value between a baseline and a current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub baseline: f64,
    pub current: f64,
    pub absolute: f64,
    /// `None` when the baseline is zero
    pub percent: Option<f64>,
}

impl Delta {
    pub fn between(baseline: f64, current: f64) -> Self {
        let percent = if baseline == 0.0 {
            None
        } else {
            Some((current - baseline) / baseline * 100.0)
        };
        Self {
            baseline,
            current,
            absolute: current - baseline,
            percent,
        }
    }
}

/// Delta of one named metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    #[serde(flatten)]
    pub delta: Delta,
}

/// Statistics for one role category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: RoleCategory,
    pub label: String,
    pub stats: SnapshotStats,
}

/// Listing count and mean salary for one employer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerSummary {
    pub employer: String,
    pub listings: usize,
    pub mean_salary: Option<f64>,
}

/// Listing-count change for one role category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: RoleCategory,
    pub label: String,
    pub listings: Delta,
    pub mean_salary: Delta,
}

/// Comparison of two snapshot statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotComparison {
    pub baseline: SnapshotStats,
    pub current: SnapshotStats,
    pub deltas: Vec<MetricDelta>,
}

impl SnapshotComparison {
    pub fn delta(&self, metric: Metric) -> Option<&Delta> {
        self.deltas
            .iter()
            .find(|d| d.metric == metric)
            .map(|d| &d.delta)
    }
}

/// Report for a single snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub date: NaiveDate,
    pub stats: SnapshotStats,
    pub by_category: Vec<CategoryStats>,
    pub top_employers: Vec<EmployerSummary>,
}

/// Report comparing two snapshot dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline_date: NaiveDate,
    pub current_date: NaiveDate,
    pub comparison: SnapshotComparison,
    pub by_category: Vec<CategoryComparison>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_percent() {
        let d = Delta::between(200.0, 250.0);
        assert_eq!(d.absolute, 50.0);
        assert_eq!(d.percent, Some(25.0));
    }

    #[test]
    fn test_delta_zero_baseline_has_no_percent() {
        let d = Delta::between(0.0, 10.0);
        assert_eq!(d.absolute, 10.0);
        assert_eq!(d.percent, None);
    }

    #[test]
    fn test_metric_delta_serializes_flat() {
        let md = MetricDelta {
            metric: Metric::MeanSalary,
            delta: Delta::between(0.0, 5.0),
        };
        let json = serde_json::to_value(md).unwrap();
        assert_eq!(json["metric"], "mean_salary");
        assert_eq!(json["absolute"], 5.0);
        assert!(json["percent"].is_null());
    }
}
