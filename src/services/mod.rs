// src/services/mod.rs

//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Salary text parsing (`parse_salary`)
//! - Publish-date windowing (`RecencyFilter`)
//! - Title relevance and role categories (`RelevanceClassifier`, `CategoryClassifier`)
//! - First-seen-wins deduplication (`Deduplicator`)
//! - Query campaigns against the search API (`FetchCampaign`)
//! - Snapshot statistics (`StatsAggregator`)

mod classifier;
mod dedup;
mod fetcher;
mod recency;
pub mod salary;
mod stats;

pub use classifier::{CategoryClassifier, KeywordSet, RelevanceClassifier};
pub use dedup::{DedupKey, Deduplicator, Keyed, dedup};
pub use fetcher::{FetchCampaign, FetchOutcome, HhClient, Pause, VacancySource};
pub use recency::RecencyFilter;
pub use salary::{SalaryParse, parse_salary, salary_bounds};
pub use stats::StatsAggregator;
