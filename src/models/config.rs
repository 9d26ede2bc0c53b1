// src/models/config.rs

//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RoleCategory;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream search API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Crawl pacing and filtering behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Fetch campaigns, each with its queries and relevance keywords
    #[serde(default = "defaults::default_campaigns")]
    pub campaigns: Vec<CampaignConfig>,

    /// Ordered role category rules (first match wins)
    #[serde(default = "defaults::default_categories")]
    pub categories: Vec<CategoryRule>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Look up a campaign by name.
    pub fn campaign(&self, name: &str) -> Option<&CampaignConfig> {
        self.campaigns.iter().find(|c| c.name == name)
    }

    /// Recency window for a campaign, falling back to the global window.
    pub fn recency_days_for(&self, campaign: &CampaignConfig) -> u32 {
        campaign.recency_days.unwrap_or(self.crawler.recency_days)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)?;
        if self.api.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(AppError::validation("api.user_agents is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if !(1..=100).contains(&self.api.per_page) {
            return Err(AppError::validation("api.per_page must be within 1..=100"));
        }
        if self.crawler.pause_min_ms > self.crawler.pause_max_ms {
            return Err(AppError::validation(
                "crawler.pause_min_ms must not exceed crawler.pause_max_ms",
            ));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.recency_days == 0 {
            return Err(AppError::validation("crawler.recency_days must be > 0"));
        }
        if self.campaigns.is_empty() {
            return Err(AppError::validation("No campaigns defined"));
        }

        let mut names = HashSet::new();
        for campaign in &self.campaigns {
            if !names.insert(campaign.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate campaign name '{}'",
                    campaign.name
                )));
            }
            if campaign.file_label.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Campaign '{}' has an empty file_label",
                    campaign.name
                )));
            }
            if campaign.queries.is_empty() {
                return Err(AppError::validation(format!(
                    "Campaign '{}' has no queries",
                    campaign.name
                )));
            }
            if campaign.keywords.is_empty() {
                return Err(AppError::validation(format!(
                    "Campaign '{}' has no relevance keywords",
                    campaign.name
                )));
            }
            if campaign.recency_days == Some(0) {
                return Err(AppError::validation(format!(
                    "Campaign '{}' recency_days must be > 0",
                    campaign.name
                )));
            }
        }

        for rule in &self.categories {
            if matches!(rule.category, RoleCategory::Other | RoleCategory::Unknown) {
                return Err(AppError::validation(format!(
                    "Category rule cannot target '{}'",
                    rule.category
                )));
            }
            if rule.keywords.is_empty() {
                return Err(AppError::validation(format!(
                    "Category rule '{}' has no keywords",
                    rule.category
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            crawler: CrawlerConfig::default(),
            paths: PathsConfig::default(),
            campaigns: defaults::default_campaigns(),
            categories: defaults::default_categories(),
        }
    }
}

/// Upstream search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Search endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Geographic area code (22 = Vladivostok)
    #[serde(default = "defaults::area")]
    pub area: String,

    /// Results per page; only the first page is requested
    #[serde(default = "defaults::per_page")]
    pub per_page: u32,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent pool, one picked at random per request
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Accept-Language header
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Referer header (empty to omit)
    #[serde(default = "defaults::referer")]
    pub referer: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            area: defaults::area(),
            per_page: defaults::per_page(),
            timeout_secs: defaults::timeout(),
            user_agents: defaults::user_agents(),
            accept_language: defaults::accept_language(),
            referer: defaults::referer(),
        }
    }
}

/// Crawl pacing and filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Lower bound of the pause between queries in milliseconds
    #[serde(default = "defaults::pause_min")]
    pub pause_min_ms: u64,

    /// Upper bound of the pause between queries in milliseconds
    #[serde(default = "defaults::pause_max")]
    pub pause_max_ms: u64,

    /// Maximum queries in flight (1 = sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Trailing publish window in days
    #[serde(default = "defaults::recency_days")]
    pub recency_days: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            pause_min_ms: defaults::pause_min(),
            pause_max_ms: defaults::pause_max(),
            max_concurrent: defaults::max_concurrent(),
            recency_days: defaults::recency_days(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the dated snapshot directories
    #[serde(default = "defaults::data_dir")]
    pub data_dir: String,

    /// Directory for JSON statistics reports
    #[serde(default = "defaults::report_dir")]
    pub report_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            report_dir: defaults::report_dir(),
        }
    }
}

/// One fetch campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Short identifier used on the command line
    pub name: String,

    /// Prefix of the snapshot file name
    pub file_label: String,

    /// Search queries issued in order
    pub queries: Vec<String>,

    /// Title substrings that make a listing relevant
    pub keywords: Vec<String>,

    /// Overrides `crawler.recency_days` for this campaign
    #[serde(default)]
    pub recency_days: Option<u32>,
}

/// Keywords mapping titles to a role category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: RoleCategory,
    pub keywords: Vec<String>,
}

mod defaults {
    use super::{CampaignConfig, CategoryRule};
    use crate::models::RoleCategory;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // API defaults
    pub fn base_url() -> String {
        "https://api.hh.ru/vacancies".into()
    }
    pub fn area() -> String {
        "22".into()
    }
    pub fn per_page() -> u32 {
        50
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agents() -> Vec<String> {
        strings(&[
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0 Safari/537.36",
        ])
    }
    pub fn accept_language() -> String {
        "ru-RU,ru;q=0.9,en;q=0.8".into()
    }
    pub fn referer() -> String {
        "https://hh.ru/".into()
    }

    // Crawler defaults
    pub fn pause_min() -> u64 {
        2000
    }
    pub fn pause_max() -> u64 {
        4000
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn recency_days() -> u32 {
        3
    }

    // Path defaults
    pub fn data_dir() -> String {
        "data".into()
    }
    pub fn report_dir() -> String {
        "report_dynamics".into()
    }

    // Campaign defaults
    pub fn default_campaigns() -> Vec<CampaignConfig> {
        vec![
            CampaignConfig {
                name: "sales".to_string(),
                file_label: "Продажи_Коммерция_3дня".to_string(),
                queries: strings(&[
                    "менеджер по продажам",
                    "руководитель отдела продаж",
                    "директор по продажам",
                    "специалист по продажам",
                    "оптовый менеджер",
                    "менеджер оптовых продаж",
                    "руководитель оптовых продаж",
                    "специалист по оптовым продажам",
                    "категорийный менеджер",
                    "менеджер категории",
                    "руководитель категории",
                    "коммерческий директор",
                    "заместитель коммерческого директора",
                    "менеджер по развитию бизнеса",
                    "специалист по развитию бизнеса",
                    "координатор продаж",
                    "аналитик продаж",
                    "менеджер по работе с клиентами",
                    "специалист по работе с клиентами",
                    "менеджер по ключевым клиентам",
                    "key account manager",
                    "менеджер активных продаж",
                    "специалист по активным продажам",
                    "b2b менеджер",
                    "менеджер b2b продаж",
                    "корпоративные продажи",
                    "менеджер по корпоративным продажам",
                    "интернет продажи",
                    "менеджер интернет продаж",
                    "онлайн продажи",
                    "e-commerce менеджер",
                    "торговый представитель",
                    "супервайзер",
                    "региональный менеджер",
                    "территориальный менеджер",
                ]),
                keywords: strings(&[
                    "продаж",
                    "продажн",
                    "продажник",
                    "sales",
                    "менеджер по продаж",
                    "руководитель продаж",
                    "директор по продаж",
                    "специалист по продаж",
                    "оптов",
                    "оптовый",
                    "категорийн",
                    "категори",
                    "коммерческ",
                    "развитие бизнес",
                    "координатор продаж",
                    "аналитик продаж",
                    "работа с клиент",
                    "ключевые клиент",
                    "key account",
                    "активные продаж",
                    "b2b",
                    "корпоративн",
                    "интернет продаж",
                    "онлайн продаж",
                    "e-commerce",
                    "торговый представитель",
                    "супервайзер",
                    "региональный менеджер",
                    "территориальный менеджер",
                    "клиентский менеджер",
                    "аккаунт менеджер",
                ]),
                recency_days: None,
            },
            CampaignConfig {
                name: "procurement".to_string(),
                file_label: "Закупки_Снабжение_Проекты_3дня".to_string(),
                queries: strings(&[
                    "менеджер по закупкам",
                    "менеджер по закупу",
                    "менеджер по закупкам и снабжению",
                    "специалист по закупкам",
                    "закупщик",
                    "менеджер по снабжению",
                    "специалист по снабжению",
                    "менеджер проектов",
                    "руководитель проектов",
                    "project manager",
                ]),
                keywords: strings(&[
                    "закуп",
                    "закупк",
                    "закупочн",
                    "закупщик",
                    "procurement",
                    "снабжен",
                    "снабжени",
                    "снабженческ",
                    "supply",
                    "проект",
                    "project",
                    "менеджер проект",
                    "руководитель проект",
                    "координатор проект",
                    "управление проект",
                ]),
                recency_days: None,
            },
        ]
    }

    // Category defaults, in rule order
    pub fn default_categories() -> Vec<CategoryRule> {
        vec![
            CategoryRule {
                category: RoleCategory::Sales,
                keywords: strings(&["продаж", "sales", "менеджер по продаж", "руководитель продаж"]),
            },
            CategoryRule {
                category: RoleCategory::Procurement,
                keywords: strings(&["закуп", "закупк", "закупщик", "снабжен", "procurement"]),
            },
            CategoryRule {
                category: RoleCategory::Projects,
                keywords: strings(&["проект", "project", "менеджер проект", "руководитель проект"]),
            },
            CategoryRule {
                category: RoleCategory::Management,
                keywords: strings(&[
                    "менеджер",
                    "руководитель",
                    "директор",
                    "manager",
                    "head",
                    "director",
                ]),
            },
        ]
    }
}
