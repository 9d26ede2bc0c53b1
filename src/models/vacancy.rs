// src/models/vacancy.rs

//! Wire types of the upstream vacancy search API.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<VacancyItem>,

    /// Total matches reported by the API (across all pages)
    #[serde(default)]
    pub found: Option<u64>,
}

/// One vacancy as returned by the search API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacancyItem {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub employer: Option<ApiEmployer>,

    #[serde(default)]
    pub alternate_url: Option<String>,

    #[serde(default)]
    pub salary: Option<ApiSalary>,

    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEmployer {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSalary {
    #[serde(default)]
    pub from: Option<f64>,

    #[serde(default)]
    pub to: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Accept identifiers sent either as strings or as numbers.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
