// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::utils::log;

/// Load and validate a configuration file, reporting what it defines.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::header(&format!("Validating {}", config_path.display()));

    let config = Config::load(config_path)?;
    match config.validate() {
        Ok(()) => {
            log::info("Configuration OK");
            log::sub_item(&format!("API: {} (area {})", config.api.base_url, config.api.area));
            log::sub_item(&format!("User agents: {}", config.api.user_agents.len()));
            log::sub_item(&format!(
                "Pause: {}-{} ms, max concurrent {}",
                config.crawler.pause_min_ms, config.crawler.pause_max_ms, config.crawler.max_concurrent
            ));
            for campaign in &config.campaigns {
                log::sub_item(&format!(
                    "Campaign '{}': {} queries, {} keywords, last {} days",
                    campaign.name,
                    campaign.queries.len(),
                    campaign.keywords.len(),
                    config.recency_days_for(campaign)
                ));
            }
            log::sub_item(&format!("Category rules: {}", config.categories.len()));
            Ok(config)
        }
        Err(e) => {
            log::warn(&format!("Validation failed: {}", e));
            Err(e)
        }
    }
}
