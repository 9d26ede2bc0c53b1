// src/services/fetcher.rs

//! Vacancy fetching.
//!
//! A [`FetchCampaign`] issues one first-page search per query against a
//! [`VacancySource`], keeps recent and relevant items, and collects them
//! into a [`FetchOutcome`]. Failed queries count as empty results.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use rand::Rng;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, CampaignConfig, Config, CrawlerConfig, Listing, SearchResponse, VacancyItem};
use crate::services::{RecencyFilter, RelevanceClassifier};
use crate::utils::http::{create_async_client, request_headers};

/// Source of search results for a query.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// First page of results for `query`.
    async fn search(&self, query: &str) -> Result<Vec<VacancyItem>>;
}

/// Client for the hh.ru-style vacancy search API.
pub struct HhClient {
    client: Client,
    config: ApiConfig,
}

impl HhClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = create_async_client(&config)?;
        Ok(Self { client, config })
    }

    /// Search URL for the first page of `query`.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let per_page = self.config.per_page.to_string();
        let url = Url::parse_with_params(
            &self.config.base_url,
            [
                ("text", query),
                ("area", self.config.area.as_str()),
                ("per_page", per_page.as_str()),
                ("page", "0"),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl VacancySource for HhClient {
    async fn search(&self, query: &str) -> Result<Vec<VacancyItem>> {
        let url = self.search_url(query)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(request_headers(&self.config))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(query, format!("HTTP {status}")));
        }

        let body = response.bytes().await?;
        let page: SearchResponse = serde_json::from_slice(&body)?;
        log::debug!(
            "'{}': {} items on first page ({} found)",
            query,
            page.items.len(),
            page.found.map_or("?".to_string(), |n| n.to_string())
        );
        Ok(page.items)
    }
}

/// Randomized politeness delay between queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    min_ms: u64,
    max_ms: u64,
}

impl Pause {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.pause_min_ms, config.pause_max_ms)
    }

    /// Draw one delay from the range.
    pub fn sample(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }

    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            log::debug!("Pausing {:.1}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
}

/// Accumulated result of one or more campaign runs.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Accepted listings in query submission order (duplicates included)
    pub listings: Vec<Listing>,
    pub query_total: usize,
    pub query_failures: usize,
    /// Items returned by the source before filtering
    pub items_seen: usize,
    /// Items rejected as outside the recency window
    pub stale: usize,
    /// Items rejected as irrelevant to the campaign
    pub irrelevant: usize,
}

impl FetchOutcome {
    /// Append another outcome, keeping order.
    pub fn merge(&mut self, other: FetchOutcome) {
        self.listings.extend(other.listings);
        self.query_total += other.query_total;
        self.query_failures += other.query_failures;
        self.items_seen += other.items_seen;
        self.stale += other.stale;
        self.irrelevant += other.irrelevant;
    }
}

/// Runs the queries of one campaign.
pub struct FetchCampaign<'a> {
    name: &'a str,
    queries: &'a [String],
    source: &'a dyn VacancySource,
    recency: RecencyFilter,
    relevance: RelevanceClassifier,
    pause: Pause,
    concurrency: usize,
}

impl<'a> FetchCampaign<'a> {
    /// Sequential campaign without pauses.
    pub fn new(
        campaign: &'a CampaignConfig,
        source: &'a dyn VacancySource,
        recency: RecencyFilter,
    ) -> Self {
        Self {
            name: &campaign.name,
            queries: &campaign.queries,
            source,
            recency,
            relevance: RelevanceClassifier::for_campaign(campaign),
            pause: Pause::none(),
            concurrency: 1,
        }
    }

    /// Campaign paced and windowed according to the configuration.
    pub fn from_config(
        config: &Config,
        campaign: &'a CampaignConfig,
        source: &'a dyn VacancySource,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let recency = RecencyFilter::new(now, config.recency_days_for(campaign));
        Self::new(campaign, source, recency)
            .with_pause(Pause::from_config(&config.crawler))
            .with_concurrency(config.crawler.max_concurrent)
    }

    pub fn with_pause(mut self, pause: Pause) -> Self {
        self.pause = pause;
        self
    }

    /// Allow up to `n` queries in flight; results are still merged in query order.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Run every query and collect accepted listings.
    pub async fn run(&self) -> FetchOutcome {
        let total = self.queries.len();
        let mut outcome = FetchOutcome {
            query_total: total,
            ..FetchOutcome::default()
        };

        let mut results = stream::iter(self.queries.iter().enumerate())
            .map(|(index, query)| async move { (index, query, self.source.search(query).await) })
            .buffered(self.concurrency);

        while let Some((index, query, result)) = results.next().await {
            match result {
                Ok(items) => {
                    let accepted = self.accept(query, items, &mut outcome);
                    log::info!(
                        "[{}] {}/{} '{}': {} accepted",
                        self.name,
                        index + 1,
                        total,
                        query,
                        accepted
                    );
                }
                Err(error) => {
                    outcome.query_failures += 1;
                    log::warn!(
                        "[{}] {}/{} '{}' failed: {}",
                        self.name,
                        index + 1,
                        total,
                        query,
                        error
                    );
                }
            }

            if index + 1 < total {
                self.pause.wait().await;
            }
        }

        outcome
    }

    /// Filter one page of items into the outcome; returns the number accepted.
    fn accept(&self, query: &str, items: Vec<VacancyItem>, outcome: &mut FetchOutcome) -> usize {
        outcome.items_seen += items.len();
        let mut accepted = 0;

        for item in items {
            if !self.recency.is_recent(item.published_at.as_deref()) {
                outcome.stale += 1;
                continue;
            }
            let listing = Listing::from_item(&item, query);
            if !self.relevance.is_relevant(&listing.title) {
                outcome.irrelevant += 1;
                continue;
            }
            log::debug!(
                "    {} - {} - {}",
                listing.title,
                listing.employer,
                listing.salary_text
            );
            outcome.listings.push(listing);
            accepted += 1;
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::{ApiEmployer, ApiSalary};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap()
    }

    fn item(id: &str, name: &str, published_at: &str) -> VacancyItem {
        VacancyItem {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            employer: Some(ApiEmployer {
                name: Some("Дикий Улов".to_string()),
            }),
            alternate_url: Some(format!("https://hh.ru/vacancy/{id}")),
            salary: Some(ApiSalary {
                from: Some(100000.0),
                to: None,
                currency: Some("RUR".to_string()),
            }),
            published_at: Some(published_at.to_string()),
        }
    }

    /// Canned results per query; a missing entry fails the request.
    #[derive(Default)]
    struct MockSource {
        pages: HashMap<String, (u64, Vec<VacancyItem>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn page(mut self, query: &str, delay_ms: u64, items: Vec<VacancyItem>) -> Self {
            self.pages.insert(query.to_string(), (delay_ms, items));
            self
        }
    }

    #[async_trait]
    impl VacancySource for MockSource {
        async fn search(&self, query: &str) -> Result<Vec<VacancyItem>> {
            self.calls.lock().unwrap().push(query.to_string());
            match self.pages.get(query) {
                Some((delay_ms, items)) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(items.clone())
                }
                None => Err(AppError::fetch(query, "HTTP 503 Service Unavailable")),
            }
        }
    }

    fn campaign(queries: &[&str]) -> CampaignConfig {
        CampaignConfig {
            name: "sales".to_string(),
            file_label: "Продажи".to_string(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
            keywords: vec!["продаж".to_string(), "sales".to_string()],
            recency_days: None,
        }
    }

    #[tokio::test]
    async fn test_filters_stale_and_irrelevant() {
        let source = MockSource::default().page(
            "q1",
            0,
            vec![
                item("1", "Менеджер по продажам", "2025-10-05T09:00:00+0300"),
                item("2", "Менеджер по продажам", "2025-09-01T09:00:00+0300"),
                item("3", "Водитель", "2025-10-05T09:00:00+0300"),
                item("4", "Sales manager", "garbage"),
            ],
        );
        let campaign = campaign(&["q1"]);
        let outcome = FetchCampaign::new(&campaign, &source, RecencyFilter::new(now(), 3))
            .run()
            .await;

        assert_eq!(outcome.items_seen, 4);
        assert_eq!(outcome.stale, 2);
        assert_eq!(outcome.irrelevant, 1);
        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.listings[0].id.as_deref(), Some("1"));
        assert_eq!(outcome.listings[0].query, "q1");
        assert_eq!(outcome.listings[0].salary_text, "от 100,000 RUR");
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_campaign() {
        let source = MockSource::default()
            .page("q1", 0, vec![item("1", "Sales lead", "2025-10-05T09:00:00Z")])
            .page("q3", 0, vec![item("3", "Sales rep", "2025-10-05T09:00:00Z")]);
        let campaign = campaign(&["q1", "q2", "q3"]);
        let outcome = FetchCampaign::new(&campaign, &source, RecencyFilter::new(now(), 3))
            .run()
            .await;

        assert_eq!(outcome.query_total, 3);
        assert_eq!(outcome.query_failures, 1);
        assert_eq!(outcome.listings.len(), 2);
        assert_eq!(*source.calls.lock().unwrap(), vec!["q1", "q2", "q3"]);
    }

    #[tokio::test]
    async fn test_concurrent_results_keep_submission_order() {
        let source = MockSource::default()
            .page("slow", 60, vec![item("1", "Sales A", "2025-10-05T09:00:00Z")])
            .page("fast", 0, vec![item("1", "Sales A (dup)", "2025-10-05T09:00:00Z")])
            .page("mid", 20, vec![item("2", "Sales B", "2025-10-05T09:00:00Z")]);
        let campaign = campaign(&["slow", "fast", "mid"]);
        let outcome = FetchCampaign::new(&campaign, &source, RecencyFilter::new(now(), 3))
            .with_concurrency(3)
            .run()
            .await;

        let queries: Vec<_> = outcome.listings.iter().map(|l| l.query.as_str()).collect();
        assert_eq!(queries, vec!["slow", "fast", "mid"]);
    }

    #[tokio::test]
    async fn test_campaign_window_override() {
        let source = MockSource::default().page(
            "q1",
            0,
            vec![item("1", "Sales", "2025-09-29T12:00:00Z")],
        );
        let mut config = Config::default();
        config.crawler.pause_min_ms = 0;
        config.crawler.pause_max_ms = 0;
        let mut wide = campaign(&["q1"]);
        wide.recency_days = Some(7);

        let outcome = FetchCampaign::from_config(&config, &wide, &source, now())
            .run()
            .await;
        assert_eq!(outcome.listings.len(), 1);

        let narrow = campaign(&["q1"]);
        let outcome = FetchCampaign::from_config(&config, &narrow, &source, now())
            .run()
            .await;
        assert_eq!(outcome.stale, 1);
    }

    #[test]
    fn test_pause_sampling() {
        assert_eq!(Pause::none().sample(), Duration::ZERO);
        let pause = Pause::new(2000, 4000);
        for _ in 0..20 {
            let d = pause.sample();
            assert!(d >= Duration::from_millis(2000) && d <= Duration::from_millis(4000));
        }
        assert_eq!(Pause::new(5, 1), Pause::new(1, 5));
    }

    #[test]
    fn test_outcome_merge() {
        let mut a = FetchOutcome {
            query_total: 2,
            query_failures: 1,
            ..FetchOutcome::default()
        };
        a.merge(FetchOutcome {
            query_total: 3,
            stale: 4,
            ..FetchOutcome::default()
        });
        assert_eq!(a.query_total, 5);
        assert_eq!(a.query_failures, 1);
        assert_eq!(a.stale, 4);
    }

    #[test]
    fn test_search_url() {
        let client = HhClient::new(ApiConfig::default()).unwrap();
        let url = client.search_url("менеджер по продажам").unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("api.hh.ru"));
        assert_eq!(pairs["text"], "менеджер по продажам");
        assert_eq!(pairs["area"], "22");
        assert_eq!(pairs["per_page"], "50");
        assert_eq!(pairs["page"], "0");
    }
}
