// src/pipeline/analyze.rs

//! Single-snapshot statistics.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{AnalysisReport, Config, SnapshotStats};
use crate::services::StatsAggregator;
use crate::storage::SnapshotStorage;
use crate::utils::log;

/// Employers listed in an analysis report.
pub const TOP_EMPLOYERS: usize = 15;

/// Report file name for a snapshot date.
pub fn analysis_report_name(date: NaiveDate) -> String {
    format!("analysis_{}.json", date)
}

/// Most recent snapshot date, if any.
pub async fn latest_snapshot(storage: &dyn SnapshotStorage) -> Result<Option<NaiveDate>> {
    Ok(storage.list_snapshots().await?.last().map(|s| s.date))
}

/// Analyze one snapshot date and write its report.
pub async fn run_analyze(
    config: &Config,
    storage: &dyn SnapshotStorage,
    date: NaiveDate,
) -> Result<AnalysisReport> {
    log::header(&format!("Analyzing snapshot {}", date));

    let records = storage.load_snapshot(date).await?;
    if records.is_empty() {
        return Err(AppError::EmptySnapshot { date });
    }

    let aggregator = StatsAggregator::new(&config.categories);
    let listings = aggregator.prepare(&records);
    let report = AnalysisReport {
        date,
        stats: StatsAggregator::compute(&listings),
        by_category: StatsAggregator::by_category(&listings),
        top_employers: StatsAggregator::top_employers(&listings, TOP_EMPLOYERS),
    };

    log::summary("Snapshot", &stats_items(&report.stats));
    log::info("By category:");
    for category in &report.by_category {
        log::sub_item(&format!(
            "{}: {} listings, mean {}",
            category.label,
            category.stats.total_listings,
            log::money(category.stats.mean_salary)
        ));
    }
    log::info("Top employers:");
    for employer in &report.top_employers {
        log::sub_item(&format!(
            "{}: {} listings, mean {}",
            employer.employer,
            employer.listings,
            employer
                .mean_salary
                .map_or_else(|| "-".to_string(), log::money)
        ));
    }

    let json = serde_json::to_vec_pretty(&report)?;
    storage
        .write_report(&analysis_report_name(date), &json)
        .await?;

    Ok(report)
}

/// Summary lines for one set of statistics.
fn stats_items(stats: &SnapshotStats) -> Vec<(&'static str, String)> {
    vec![
        ("Listings", stats.total_listings.to_string()),
        ("With salary", stats.with_salary.to_string()),
        ("Employers", stats.unique_employers.to_string()),
        ("Mean", log::money(stats.mean_salary)),
        ("Median", log::money(stats.median_salary)),
        ("Std", log::money(stats.std_salary)),
        (
            "Range",
            format!("{} – {}", log::money(stats.min_salary), log::money(stats.max_salary)),
        ),
        (
            "IQR",
            format!("{} – {}", log::money(stats.q25_salary), log::money(stats.q75_salary)),
        ),
    ]
}
