// src/pipeline/compare.rs

//! Period-over-period comparison of two snapshots.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{ComparisonReport, Config};
use crate::services::StatsAggregator;
use crate::storage::SnapshotStorage;
use crate::utils::log;

/// Report file name for a comparison.
pub fn comparison_report_name(baseline: NaiveDate, current: NaiveDate) -> String {
    format!("dynamics_{}_{}.json", baseline, current)
}

/// Compare two snapshot dates and write the comparison report.
///
/// Either side may be empty, but not both.
pub async fn run_compare(
    config: &Config,
    storage: &dyn SnapshotStorage,
    baseline: NaiveDate,
    current: NaiveDate,
) -> Result<ComparisonReport> {
    log::header(&format!("Comparing {} → {}", baseline, current));

    log::step(1, 3, "Loading snapshots");
    let before = storage.load_snapshot(baseline).await?;
    let after = storage.load_snapshot(current).await?;
    if before.is_empty() && after.is_empty() {
        return Err(AppError::EmptyComparison { baseline, current });
    }
    log::sub_item(&format!("{}: {} listings", baseline, before.len()));
    log::sub_item(&format!("{}: {} listings", current, after.len()));

    log::step(2, 3, "Computing statistics");
    let aggregator = StatsAggregator::new(&config.categories);
    let before = aggregator.prepare(&before);
    let after = aggregator.prepare(&after);
    let comparison = StatsAggregator::compare(
        &StatsAggregator::compute(&before),
        &StatsAggregator::compute(&after),
    );
    let report = ComparisonReport {
        baseline_date: baseline,
        current_date: current,
        comparison,
        by_category: StatsAggregator::compare_categories(&before, &after),
    };

    for delta in &report.comparison.deltas {
        log::sub_item(&format!(
            "{}: {} → {} ({:+.0}, {})",
            delta.metric,
            delta.delta.baseline,
            delta.delta.current,
            delta.delta.absolute,
            log::percent(delta.delta.percent)
        ));
    }
    log::separator();
    for category in &report.by_category {
        log::sub_item(&format!(
            "{}: {} → {} listings ({})",
            category.label,
            category.listings.baseline,
            category.listings.current,
            log::percent(category.listings.percent)
        ));
    }

    log::step(3, 3, "Writing report");
    let json = serde_json::to_vec_pretty(&report)?;
    storage
        .write_report(&comparison_report_name(baseline, current), &json)
        .await?;

    Ok(report)
}
