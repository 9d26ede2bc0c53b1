// src/models/mod.rs

//! Domain models for the vacancy crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod category;
mod config;
mod listing;
mod stats;
mod vacancy;

// Re-export all public types
pub use category::RoleCategory;
pub use config::{ApiConfig, CampaignConfig, CategoryRule, Config, CrawlerConfig, PathsConfig};
pub use listing::{
    Listing, ListingRecord, NOT_SPECIFIED, ParsedListing, ParsedSalary, PublishedAt,
    UNKNOWN_EMPLOYER, UNKNOWN_WHEN, format_salary,
};
pub use stats::{
    AnalysisReport, CategoryComparison, CategoryStats, ComparisonReport, Delta, EmployerSummary,
    Metric, MetricDelta, SnapshotComparison, SnapshotStats,
};
pub use vacancy::{ApiEmployer, ApiSalary, SearchResponse, VacancyItem};
