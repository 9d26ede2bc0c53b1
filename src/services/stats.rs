// src/services/stats.rs

//! Descriptive statistics over persisted snapshots.

use std::collections::{HashMap, HashSet};

use crate::models::{
    CategoryComparison, CategoryRule, CategoryStats, Delta, EmployerSummary, ListingRecord,
    Metric, MetricDelta, ParsedListing, RoleCategory, SnapshotComparison, SnapshotStats,
};
use crate::services::CategoryClassifier;
use crate::services::salary::parse_salary;

/// Turns snapshot rows into parsed listings and aggregates them.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    categories: CategoryClassifier,
}

impl StatsAggregator {
    pub fn new(rules: &[CategoryRule]) -> Self {
        Self {
            categories: CategoryClassifier::new(rules),
        }
    }

    /// Derive salary bounds and role category for each row.
    pub fn prepare(&self, records: &[ListingRecord]) -> Vec<ParsedListing> {
        records
            .iter()
            .map(|record| ParsedListing {
                title: record.title.clone(),
                employer: record.employer.clone(),
                category: self.categories.categorize(Some(record.title.as_str())),
                salary: parse_salary(Some(record.salary.as_str())).bounds(),
            })
            .collect()
    }

    /// Summary statistics; salary fields are zero when no listing has a salary.
    pub fn compute(listings: &[ParsedListing]) -> SnapshotStats {
        let mut salaries: Vec<f64> = listings
            .iter()
            .filter_map(ParsedListing::average_salary)
            .collect();
        salaries.sort_by(f64::total_cmp);

        let unique_employers = listings
            .iter()
            .map(|l| l.employer.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut stats = SnapshotStats {
            total_listings: listings.len(),
            with_salary: salaries.len(),
            unique_employers,
            ..SnapshotStats::default()
        };
        if salaries.is_empty() {
            return stats;
        }

        let mean = salaries.iter().sum::<f64>() / salaries.len() as f64;
        let variance =
            salaries.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / salaries.len() as f64;

        stats.mean_salary = mean;
        stats.median_salary = percentile(&salaries, 0.5);
        stats.std_salary = variance.sqrt();
        stats.min_salary = salaries[0];
        stats.max_salary = salaries[salaries.len() - 1];
        stats.q25_salary = percentile(&salaries, 0.25);
        stats.q75_salary = percentile(&salaries, 0.75);
        stats
    }

    /// Statistics per role category, in category order, skipping empty categories.
    pub fn by_category(listings: &[ParsedListing]) -> Vec<CategoryStats> {
        RoleCategory::ALL
            .iter()
            .filter_map(|&category| {
                let subset: Vec<ParsedListing> = listings
                    .iter()
                    .filter(|l| l.category == category)
                    .cloned()
                    .collect();
                (!subset.is_empty()).then(|| CategoryStats {
                    category,
                    label: category.display_name().to_string(),
                    stats: Self::compute(&subset),
                })
            })
            .collect()
    }

    /// Employers with the most listings; ties broken by name.
    pub fn top_employers(listings: &[ParsedListing], n: usize) -> Vec<EmployerSummary> {
        let mut by_employer: HashMap<&str, (usize, Vec<f64>)> = HashMap::new();
        for listing in listings {
            let entry = by_employer.entry(listing.employer.as_str()).or_default();
            entry.0 += 1;
            if let Some(salary) = listing.average_salary() {
                entry.1.push(salary);
            }
        }

        let mut summaries: Vec<EmployerSummary> = by_employer
            .into_iter()
            .map(|(employer, (count, salaries))| EmployerSummary {
                employer: employer.to_string(),
                listings: count,
                mean_salary: (!salaries.is_empty())
                    .then(|| salaries.iter().sum::<f64>() / salaries.len() as f64),
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.listings
                .cmp(&a.listings)
                .then_with(|| a.employer.cmp(&b.employer))
        });
        summaries.truncate(n);
        summaries
    }

    /// Per-metric deltas from `baseline` to `current`.
    pub fn compare(baseline: &SnapshotStats, current: &SnapshotStats) -> SnapshotComparison {
        let deltas = Metric::ALL
            .iter()
            .map(|&metric| MetricDelta {
                metric,
                delta: Delta::between(baseline.value(metric), current.value(metric)),
            })
            .collect();
        SnapshotComparison {
            baseline: *baseline,
            current: *current,
            deltas,
        }
    }

    /// Listing-count and mean-salary change per category present on either side.
    pub fn compare_categories(
        baseline: &[ParsedListing],
        current: &[ParsedListing],
    ) -> Vec<CategoryComparison> {
        let before = Self::by_category(baseline);
        let after = Self::by_category(current);
        let find = |set: &[CategoryStats], category: RoleCategory| {
            set.iter()
                .find(|c| c.category == category)
                .map(|c| c.stats)
                .unwrap_or_default()
        };

        RoleCategory::ALL
            .iter()
            .filter(|&&category| {
                before.iter().any(|c| c.category == category)
                    || after.iter().any(|c| c.category == category)
            })
            .map(|&category| {
                let b = find(&before, category);
                let a = find(&after, category);
                CategoryComparison {
                    category,
                    label: category.display_name().to_string(),
                    listings: Delta::between(b.total_listings as f64, a.total_listings as f64),
                    mean_salary: Delta::between(b.mean_salary, a.mean_salary),
                }
            })
            .collect()
    }
}

/// Linear-interpolation percentile of sorted, non-empty values; `p` in `[0, 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Config, ParsedSalary};

    fn parsed(employer: &str, category: RoleCategory, lower: Option<i64>, upper: Option<i64>) -> ParsedListing {
        ParsedListing {
            title: "t".to_string(),
            employer: employer.to_string(),
            category,
            salary: ParsedSalary { lower, upper },
        }
    }

    fn record(title: &str, employer: &str, salary: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_string(),
            employer: employer.to_string(),
            url: String::new(),
            published: "2025-10-05 09:00".to_string(),
            when: "сегодня".to_string(),
            salary: salary.to_string(),
            query: "q".to_string(),
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 4.0);
        assert_eq!(percentile(&values, 0.5), 2.5);
        assert_eq!(percentile(&values, 0.25), 1.75);
        assert_eq!(percentile(&values, 0.75), 3.25);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(StatsAggregator::compute(&[]), SnapshotStats::default());
    }

    #[test]
    fn test_no_salaries_keeps_counts() {
        let listings = vec![
            parsed("A", RoleCategory::Sales, None, None),
            parsed("B", RoleCategory::Sales, None, None),
        ];
        let stats = StatsAggregator::compute(&listings);
        assert_eq!(stats.total_listings, 2);
        assert_eq!(stats.with_salary, 0);
        assert_eq!(stats.unique_employers, 2);
        assert_eq!(stats.mean_salary, 0.0);
    }

    #[test]
    fn test_single_value() {
        let stats = StatsAggregator::compute(&[parsed("A", RoleCategory::Sales, Some(75000), None)]);
        assert_eq!(stats.mean_salary, 75000.0);
        assert_eq!(stats.median_salary, 75000.0);
        assert_eq!(stats.min_salary, 75000.0);
        assert_eq!(stats.max_salary, 75000.0);
        assert_eq!(stats.q25_salary, 75000.0);
        assert_eq!(stats.std_salary, 0.0);
    }

    #[test]
    fn test_population_std() {
        let listings: Vec<_> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .map(|v| parsed("A", RoleCategory::Other, Some(*v), None))
            .collect();
        let stats = StatsAggregator::compute(&listings);
        assert_eq!(stats.mean_salary, 5.0);
        assert_eq!(stats.std_salary, 2.0);
        assert_eq!(stats.median_salary, 4.5);
        assert_eq!(stats.unique_employers, 1);
    }

    #[test]
    fn test_range_and_from_average_to_same_value() {
        let aggregator = StatsAggregator::new(&Config::default().categories);
        let listings = aggregator.prepare(&[
            record("Менеджер по продажам", "A", "80 000–120 000 RUR"),
            record("Менеджер по продажам", "B", "от 100000 RUR"),
        ]);
        assert_eq!(listings[0].average_salary(), Some(100000.0));
        assert_eq!(listings[1].average_salary(), Some(100000.0));
        assert_eq!(listings[0].category, RoleCategory::Sales);

        let stats = StatsAggregator::compute(&listings);
        assert_eq!(stats.total_listings, 2);
        assert_eq!(stats.mean_salary, 100000.0);
        assert_eq!(stats.median_salary, 100000.0);
        assert_eq!(stats.std_salary, 0.0);
    }

    #[test]
    fn test_by_category_in_category_order() {
        let listings = vec![
            parsed("A", RoleCategory::Other, Some(10), None),
            parsed("B", RoleCategory::Sales, Some(30), None),
            parsed("C", RoleCategory::Sales, Some(50), None),
        ];
        let split = StatsAggregator::by_category(&listings);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].category, RoleCategory::Sales);
        assert_eq!(split[0].stats.total_listings, 2);
        assert_eq!(split[0].stats.mean_salary, 40.0);
        assert_eq!(split[1].category, RoleCategory::Other);
    }

    #[test]
    fn test_top_employers() {
        let listings = vec![
            parsed("B", RoleCategory::Sales, Some(100), None),
            parsed("A", RoleCategory::Sales, None, None),
            parsed("B", RoleCategory::Sales, Some(200), None),
            parsed("C", RoleCategory::Sales, None, None),
        ];
        let top = StatsAggregator::top_employers(&listings, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].employer, "B");
        assert_eq!(top[0].listings, 2);
        assert_eq!(top[0].mean_salary, Some(150.0));
        assert_eq!(top[1].employer, "A");
        assert_eq!(top[1].mean_salary, None);
    }

    #[test]
    fn test_compare_with_zero_baseline() {
        let baseline = SnapshotStats::default();
        let current = StatsAggregator::compute(&[parsed("A", RoleCategory::Sales, Some(100), None)]);
        let comparison = StatsAggregator::compare(&baseline, &current);

        assert_eq!(comparison.deltas.len(), Metric::ALL.len());
        let mean = comparison.delta(Metric::MeanSalary).unwrap();
        assert_eq!(mean.absolute, 100.0);
        assert_eq!(mean.percent, None);
    }

    #[test]
    fn test_compare_percent() {
        let before = StatsAggregator::compute(&[
            parsed("A", RoleCategory::Sales, Some(100), None),
            parsed("B", RoleCategory::Sales, Some(100), None),
        ]);
        let after = StatsAggregator::compute(&[parsed("A", RoleCategory::Sales, Some(150), None)]);
        let comparison = StatsAggregator::compare(&before, &after);

        let total = comparison.delta(Metric::TotalListings).unwrap();
        assert_eq!(total.absolute, -1.0);
        assert_eq!(total.percent, Some(-50.0));
        let mean = comparison.delta(Metric::MeanSalary).unwrap();
        assert_eq!(mean.percent, Some(50.0));
    }

    #[test]
    fn test_compare_categories() {
        let before = vec![parsed("A", RoleCategory::Sales, Some(100), None)];
        let after = vec![
            parsed("A", RoleCategory::Sales, Some(100), None),
            parsed("B", RoleCategory::Sales, None, None),
            parsed("C", RoleCategory::Procurement, Some(50), None),
        ];
        let rows = StatsAggregator::compare_categories(&before, &after);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, RoleCategory::Sales);
        assert_eq!(rows[0].listings.absolute, 1.0);
        assert_eq!(rows[0].listings.percent, Some(100.0));
        assert_eq!(rows[1].category, RoleCategory::Procurement);
        assert_eq!(rows[1].listings.percent, None);
    }
}
