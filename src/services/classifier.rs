// src/services/classifier.rs

//! Keyword-based title classification.
//!
//! Both campaign relevance and role categorization are substring tests
//! over the lower-cased title. Substring matching accepts false positives
//! such as "Sales Hub Developer" counting as a sales title.

use crate::models::{CampaignConfig, CategoryRule, RoleCategory};

/// Ordered set of lower-cased title substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// First keyword found in the title, if any.
    pub fn find(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .find(|k| title.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, title: &str) -> bool {
        self.find(title).is_some()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Decides whether a title belongs to a fetch campaign.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    keywords: KeywordSet,
}

impl RelevanceClassifier {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    pub fn for_campaign(campaign: &CampaignConfig) -> Self {
        Self::new(KeywordSet::new(&campaign.keywords))
    }

    /// Blank titles are never relevant.
    pub fn is_relevant(&self, title: &str) -> bool {
        !title.trim().is_empty() && self.keywords.matches(title)
    }
}

/// Maps titles to a [`RoleCategory`]; rules are tried in order, first match wins.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<(RoleCategory, KeywordSet)>,
}

impl CategoryClassifier {
    pub fn new(rules: &[CategoryRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| (rule.category, KeywordSet::new(&rule.keywords)))
                .collect(),
        }
    }

    /// Category for a title: `Unknown` when absent or blank, `Other` when no rule matches.
    pub fn categorize(&self, title: Option<&str>) -> RoleCategory {
        let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
            return RoleCategory::Unknown;
        };
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.matches(title))
            .map_or(RoleCategory::Other, |(category, _)| *category)
    }
}
