// src/models/listing.rs

//! Listing data structures: the fetched listing, its persisted row form,
//! and the parsed form consumed by statistics.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ApiSalary, RoleCategory, VacancyItem};
use crate::utils::group_digits;

/// Marker written when a field has no value.
pub const NOT_SPECIFIED: &str = "не указано";

/// Relative-date label for a missing or unparsable timestamp.
pub const UNKNOWN_WHEN: &str = "неизвестно";

/// Employer name used when the API item has none.
pub const UNKNOWN_EMPLOYER: &str = "Не указана";

/// A listing extracted from one API result item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Upstream identifier, if the item carried one
    pub id: Option<String>,

    /// Vacancy title
    pub title: String,

    /// Employer display name
    pub employer: String,

    /// Canonical listing URL
    pub url: String,

    /// Formatted salary text (e.g. `80,000–120,000 RUR`)
    pub salary_text: String,

    /// Raw ISO 8601 publish timestamp
    pub published_at: Option<String>,

    /// Query that produced this listing
    pub query: String,
}

impl Listing {
    /// Build a listing from an API item.
    pub fn from_item(item: &VacancyItem, query: &str) -> Self {
        Self {
            id: item.id.clone().filter(|id| !id.trim().is_empty()),
            title: item.name.clone().unwrap_or_default(),
            employer: item
                .employer
                .as_ref()
                .and_then(|e| e.name.clone())
                .unwrap_or_else(|| UNKNOWN_EMPLOYER.to_string()),
            url: item.alternate_url.clone().unwrap_or_default(),
            salary_text: format_salary(item.salary.as_ref()),
            published_at: item.published_at.clone(),
            query: query.to_string(),
        }
    }

    /// Parsed publish timestamp.
    pub fn published(&self) -> PublishedAt {
        PublishedAt::parse(self.published_at.as_deref())
    }

    /// Convert to the persisted row form, rendering dates relative to `now`.
    pub fn to_record(&self, now: DateTime<Utc>) -> ListingRecord {
        let published = self.published();
        let formatted = match &published {
            PublishedAt::At(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            PublishedAt::Missing => NOT_SPECIFIED.to_string(),
            PublishedAt::Unparsable => self.published_at.clone().unwrap_or_default(),
        };

        ListingRecord {
            title: self.title.clone(),
            employer: self.employer.clone(),
            url: self.url.clone(),
            published: formatted,
            when: published.relative_label(now),
            salary: self.salary_text.clone(),
            query: self.query.clone(),
        }
    }
}

/// One persisted snapshot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub employer: String,
    pub url: String,
    /// Publish date as `%Y-%m-%d %H:%M`, or `не указано`
    pub published: String,
    /// Relative-date label
    pub when: String,
    pub salary: String,
    pub query: String,
}

impl ListingRecord {
    /// Snapshot header row, in column order.
    pub const HEADERS: [&'static str; 7] = [
        "Название вакансии",
        "Компания",
        "Ссылка",
        "Дата публикации",
        "Когда",
        "Зарплата",
        "Запрос",
    ];

    /// Row cells in column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.employer.clone(),
            self.url.clone(),
            self.published.clone(),
            self.when.clone(),
            self.salary.clone(),
            self.query.clone(),
        ]
    }

    /// Build a record from row cells; `None` if the row is too short.
    pub fn from_row(row: &[String]) -> Option<Self> {
        match row {
            [title, employer, url, published, when, salary, query, ..] => Some(Self {
                title: title.clone(),
                employer: employer.clone(),
                url: url.clone(),
                published: published.clone(),
                when: when.clone(),
                salary: salary.clone(),
                query: query.clone(),
            }),
            _ => None,
        }
    }

    /// Whether a row is the header row.
    pub fn is_header(row: &[String]) -> bool {
        row.first()
            .is_some_and(|cell| cell.trim_start_matches('\u{feff}') == Self::HEADERS[0])
    }

    pub fn has_salary(&self) -> bool {
        !self.salary.trim().is_empty() && self.salary.trim() != NOT_SPECIFIED
    }

    pub fn has_date(&self) -> bool {
        !self.published.trim().is_empty() && self.published.trim() != NOT_SPECIFIED
    }
}

/// Numeric salary bounds in the listing's own currency units.
///
/// `lower <= upper` is expected for well-formed text but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedSalary {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl ParsedSalary {
    pub const ABSENT: ParsedSalary = ParsedSalary {
        lower: None,
        upper: None,
    };

    /// Mean of both bounds, or the single bound present.
    pub fn average(&self) -> Option<f64> {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) => Some((lo as f64 + hi as f64) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v as f64),
            (None, None) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// A persisted listing with its derived salary and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedListing {
    pub title: String,
    pub employer: String,
    pub category: RoleCategory,
    pub salary: ParsedSalary,
}

impl ParsedListing {
    pub fn average_salary(&self) -> Option<f64> {
        self.salary.average()
    }
}

/// Outcome of parsing a publish timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedAt {
    /// No timestamp supplied
    Missing,
    /// Timestamp present but not recognised
    Unparsable,
    At(DateTime<FixedOffset>),
}

impl PublishedAt {
    /// Parse an ISO 8601 timestamp.
    ///
    /// Accepts `Z`, `+03:00` and `+0300` offsets, optional fractional
    /// seconds, and naive timestamps (taken as UTC).
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Missing;
        };
        parse_timestamp(raw).map_or(Self::Unparsable, Self::At)
    }

    /// Whole days elapsed from the timestamp to `now` (negative if in the future).
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> Option<i64> {
        match self {
            Self::At(dt) => Some((now - dt.with_timezone(&Utc)).num_days()),
            _ => None,
        }
    }

    /// Human label: `сегодня`, `вчера`, `N дней назад`, or the date itself.
    pub fn relative_label(&self, now: DateTime<Utc>) -> String {
        match (self, self.elapsed_days(now)) {
            (Self::At(dt), Some(days)) => match days {
                d if d <= 0 => "сегодня".to_string(),
                1 => "вчера".to_string(),
                d if d <= 7 => format!("{d} дней назад"),
                _ => dt.format("%Y-%m-%d %H:%M").to_string(),
            },
            _ => UNKNOWN_WHEN.to_string(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Render an API salary object the way snapshot files store it.
pub fn format_salary(salary: Option<&ApiSalary>) -> String {
    let Some(salary) = salary else {
        return NOT_SPECIFIED.to_string();
    };
    let currency = salary.currency.as_deref().unwrap_or("RUR");
    let bound = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0).map(|v| v.round() as i64);

    match (bound(salary.from), bound(salary.to)) {
        (Some(from), Some(to)) => format!(
            "{}–{} {}",
            group_digits(from, ','),
            group_digits(to, ','),
            currency
        ),
        (Some(from), None) => format!("от {} {}", group_digits(from, ','), currency),
        (None, Some(to)) => format!("до {} {}", group_digits(to, ','), currency),
        (None, None) => NOT_SPECIFIED.to_string(),
    }
}
