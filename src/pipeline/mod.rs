// src/pipeline/mod.rs

//! Pipeline entry points for crawler operations.
//!
//! - `run_collect`: Fetch campaigns and write today's snapshot files
//! - `run_analyze`: Statistics for one snapshot date
//! - `run_compare`: Deltas between two snapshot dates
//! - `run_validate`: Check a configuration file

pub mod analyze;
pub mod collect;
pub mod compare;
pub mod validate;

pub use analyze::{latest_snapshot, run_analyze};
pub use collect::{CampaignSummary, CollectSummary, run_collect};
pub use compare::run_compare;
pub use validate::run_validate;
