// src/pipeline/collect.rs

//! Listing collection pipeline.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, Result};
use crate::models::{CampaignConfig, Config, EmployerSummary, ListingRecord};
use crate::services::{Deduplicator, FetchCampaign, FetchOutcome, StatsAggregator, VacancySource};
use crate::storage::{SnapshotStorage, WriteMetadata};
use crate::utils::log;

/// Employers listed in a campaign summary.
const TOP_EMPLOYERS: usize = 5;

/// Result of collecting one campaign.
#[derive(Debug, Clone)]
pub struct CampaignSummary {
    pub name: String,
    pub queries: usize,
    pub failed_queries: usize,
    /// Accepted listings before deduplication
    pub accepted: usize,
    pub unique: usize,
    pub employers: usize,
    pub with_salary: usize,
    pub with_date: usize,
    pub top_employers: Vec<EmployerSummary>,
    /// `None` when nothing was accepted and no file was written
    pub written: Option<WriteMetadata>,
}

/// Result of one collection run.
#[derive(Debug, Clone)]
pub struct CollectSummary {
    pub date: NaiveDate,
    pub campaigns: Vec<CampaignSummary>,
}

impl CollectSummary {
    pub fn total_unique(&self) -> usize {
        self.campaigns.iter().map(|c| c.unique).sum()
    }
}

/// Pick the campaigns to run; an empty filter selects all of them.
pub fn select_campaigns<'a>(config: &'a Config, only: &[String]) -> Result<Vec<&'a CampaignConfig>> {
    if only.is_empty() {
        return Ok(config.campaigns.iter().collect());
    }
    only.iter()
        .map(|name| {
            config
                .campaign(name)
                .ok_or_else(|| AppError::UnknownCampaign(name.clone()))
        })
        .collect()
}

/// Run the collection pipeline.
///
/// Every selected campaign is fetched before any deduplication happens,
/// so first-seen order is query submission order within a campaign.
pub async fn run_collect(
    config: &Config,
    storage: &dyn SnapshotStorage,
    source: &dyn VacancySource,
    only: &[String],
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<CollectSummary> {
    let campaigns = select_campaigns(config, only)?;
    log::header(&format!("Collecting vacancies for {}", today));

    let total = campaigns.len() + 1;
    let mut outcomes: Vec<(&CampaignConfig, FetchOutcome)> = Vec::with_capacity(campaigns.len());
    for (i, campaign) in campaigns.into_iter().enumerate() {
        log::step(
            i + 1,
            total,
            &format!(
                "Campaign '{}' ({} queries, last {} days)",
                campaign.name,
                campaign.queries.len(),
                config.recency_days_for(campaign)
            ),
        );
        let outcome = FetchCampaign::from_config(config, campaign, source, now)
            .run()
            .await;
        outcomes.push((campaign, outcome));
    }

    log::step(total, total, "Deduplicating and writing snapshots");
    let aggregator = StatsAggregator::new(&config.categories);
    let mut summaries = Vec::with_capacity(outcomes.len());

    for (campaign, outcome) in outcomes {
        let accepted = outcome.listings.len();
        let mut unique = Deduplicator::new();
        unique.extend(outcome.listings);
        let records: Vec<ListingRecord> = unique
            .finish()
            .iter()
            .map(|listing| listing.to_record(now))
            .collect();

        let written = if records.is_empty() {
            log::warn(&format!(
                "Campaign '{}' produced no listings, nothing written",
                campaign.name
            ));
            None
        } else {
            Some(
                storage
                    .write_snapshot(today, &campaign.file_label, &records)
                    .await?,
            )
        };

        let parsed = aggregator.prepare(&records);
        let stats = StatsAggregator::compute(&parsed);
        let summary = CampaignSummary {
            name: campaign.name.clone(),
            queries: outcome.query_total,
            failed_queries: outcome.query_failures,
            accepted,
            unique: records.len(),
            employers: stats.unique_employers,
            with_salary: records.iter().filter(|r| r.has_salary()).count(),
            with_date: records.iter().filter(|r| r.has_date()).count(),
            top_employers: StatsAggregator::top_employers(&parsed, TOP_EMPLOYERS),
            written,
        };
        report_campaign(&summary);
        summaries.push(summary);
    }

    Ok(CollectSummary {
        date: today,
        campaigns: summaries,
    })
}

fn report_campaign(summary: &CampaignSummary) {
    log::summary(
        &format!("Campaign '{}'", summary.name),
        &[
            (
                "Queries",
                format!("{} ({} failed)", summary.queries, summary.failed_queries),
            ),
            ("Accepted", summary.accepted.to_string()),
            ("Unique", summary.unique.to_string()),
            ("Employers", summary.employers.to_string()),
            ("With salary", summary.with_salary.to_string()),
            ("With date", summary.with_date.to_string()),
            (
                "File",
                summary
                    .written
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |w| w.path.clone()),
            ),
        ],
    );
    if !summary.top_employers.is_empty() {
        log::info(&format!("Top {} employers:", summary.top_employers.len()));
        for employer in &summary.top_employers {
            log::sub_item(&format!("{}: {}", employer.employer, employer.listings));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        let config = Config::default();
        let selected = select_campaigns(&config, &[]).unwrap();
        assert_eq!(selected.len(), config.campaigns.len());
    }

    #[test]
    fn test_select_by_name() {
        let config = Config::default();
        let selected = select_campaigns(&config, &["procurement".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "procurement");
    }

    #[test]
    fn test_unknown_campaign() {
        let config = Config::default();
        let err = select_campaigns(&config, &["marketing".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::UnknownCampaign(name) if name == "marketing"));
    }
}
