// src/models/category.rs

//! Role category assigned from a listing title.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of role categories.
///
/// Variant order is the reporting order; category rules are evaluated in
/// configuration order, not in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Sales,
    Procurement,
    Projects,
    Management,
    Other,
    Unknown,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 6] = [
        RoleCategory::Sales,
        RoleCategory::Procurement,
        RoleCategory::Projects,
        RoleCategory::Management,
        RoleCategory::Other,
        RoleCategory::Unknown,
    ];

    /// Stable lowercase identifier (matches the serde name).
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Sales => "sales",
            RoleCategory::Procurement => "procurement",
            RoleCategory::Projects => "projects",
            RoleCategory::Management => "management",
            RoleCategory::Other => "other",
            RoleCategory::Unknown => "unknown",
        }
    }

    /// Label used in Russian-language reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleCategory::Sales => "Продажи",
            RoleCategory::Procurement => "Закупки",
            RoleCategory::Projects => "Проекты",
            RoleCategory::Management => "Менеджмент",
            RoleCategory::Other => "Другое",
            RoleCategory::Unknown => "Неизвестно",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
