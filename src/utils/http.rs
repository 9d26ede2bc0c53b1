// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::error::Result;
use crate::models::ApiConfig;

/// Fallback when the configured pool is empty.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; vacancy-crawler/0.1)";

/// Create a configured asynchronous HTTP client.
///
/// gzip/brotli/deflate response bodies are decompressed transparently.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .build()?;
    Ok(client)
}

/// Pick a user agent at random from the pool.
pub fn random_user_agent(pool: &[String]) -> &str {
    pool.choose(&mut rand::thread_rng())
        .map(String::as_str)
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or(DEFAULT_USER_AGENT)
}

/// Request headers for one search call.
pub fn request_headers(config: &ApiConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(random_user_agent(&config.user_agents)) {
        headers.insert(USER_AGENT, value);
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }
    if !config.referer.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&config.referer) {
            headers.insert(REFERER, value);
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_from_pool() {
        let pool = vec!["a".to_string(), "b".to_string()];
        for _ in 0..10 {
            let ua = random_user_agent(&pool);
            assert!(ua == "a" || ua == "b");
        }
    }

    #[test]
    fn test_random_user_agent_empty_pool() {
        assert_eq!(random_user_agent(&[]), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_request_headers() {
        let config = ApiConfig::default();
        let headers = request_headers(&config);
        assert!(headers.contains_key(USER_AGENT));
        assert_eq!(headers[ACCEPT_LANGUAGE], "ru-RU,ru;q=0.9,en;q=0.8");
        assert_eq!(headers[REFERER], "https://hh.ru/");
    }

    #[test]
    fn test_client_builds() {
        assert!(create_async_client(&ApiConfig::default()).is_ok());
    }
}
