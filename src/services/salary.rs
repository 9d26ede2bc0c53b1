// src/services/salary.rs

//! Salary text parsing.
//!
//! Turns snapshot salary strings such as `80,000–120,000 RUR`,
//! `от 100 000 RUR` or `не указано` into numeric bounds. Parsing never
//! fails: anything unrecognised becomes [`SalaryParse::Unparsable`].

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{NOT_SPECIFIED, ParsedSalary};

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)–(\d+)").expect("valid range pattern"));
// Keywords must start a word, so "auto100" does not read as "to 100".
static FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}])(?:от|from)\s*(\d[\d\s,]*)").expect("valid from pattern")
});
static TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}])(?:до|to)\s*(\d[\d\s,]*)").expect("valid to pattern")
});

/// Outcome of parsing a salary string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryParse {
    /// Absent text or the "not specified" sentinel
    NotSpecified,
    Range(i64, i64),
    From(i64),
    To(i64),
    /// Text present but no pattern matched
    Unparsable,
}

impl SalaryParse {
    /// Numeric bounds; both absent for `NotSpecified` and `Unparsable`.
    pub fn bounds(&self) -> ParsedSalary {
        match *self {
            SalaryParse::Range(lower, upper) => ParsedSalary {
                lower: Some(lower),
                upper: Some(upper),
            },
            SalaryParse::From(lower) => ParsedSalary {
                lower: Some(lower),
                upper: None,
            },
            SalaryParse::To(upper) => ParsedSalary {
                lower: None,
                upper: Some(upper),
            },
            SalaryParse::NotSpecified | SalaryParse::Unparsable => ParsedSalary::ABSENT,
        }
    }
}

/// Classify a salary string.
pub fn parse_salary(text: Option<&str>) -> SalaryParse {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return SalaryParse::NotSpecified;
    };
    let lowered = text.to_lowercase();
    if lowered == NOT_SPECIFIED || lowered == "not specified" {
        return SalaryParse::NotSpecified;
    }

    let compact: String = lowered
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if let Some(caps) = RANGE_RE.captures(&compact) {
        return match (caps[1].parse(), caps[2].parse()) {
            (Ok(lower), Ok(upper)) => SalaryParse::Range(lower, upper),
            _ => SalaryParse::Unparsable,
        };
    }
    if let Some(caps) = FROM_RE.captures(&lowered) {
        return strip_number(&caps[1]).map_or(SalaryParse::Unparsable, SalaryParse::From);
    }
    if let Some(caps) = TO_RE.captures(&lowered) {
        return strip_number(&caps[1]).map_or(SalaryParse::Unparsable, SalaryParse::To);
    }
    SalaryParse::Unparsable
}

/// Parse digits interleaved with whitespace and `,` group separators.
fn strip_number(text: &str) -> Option<i64> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .parse()
        .ok()
}

/// Parse a salary string straight to bounds.
pub fn salary_bounds(text: Option<&str>) -> ParsedSalary {
    parse_salary(text).bounds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_with_group_separators() {
        assert_eq!(
            parse_salary(Some("80,000–120,000 RUR")),
            SalaryParse::Range(80000, 120000)
        );
        assert_eq!(
            parse_salary(Some("80 000–120 000 RUR")),
            SalaryParse::Range(80000, 120000)
        );
        assert_eq!(
            parse_salary(Some("80\u{a0}000 – 120\u{a0}000 ₽")),
            SalaryParse::Range(80000, 120000)
        );
    }

    #[test]
    fn test_from_and_to() {
        assert_eq!(parse_salary(Some("от 100000 RUR")), SalaryParse::From(100000));
        assert_eq!(parse_salary(Some("От 100,000 RUR")), SalaryParse::From(100000));
        assert_eq!(parse_salary(Some("до 90 000 RUR")), SalaryParse::To(90000));
        assert_eq!(parse_salary(Some("from 3,000 USD")), SalaryParse::From(3000));
    }

    #[test]
    fn test_keywords_must_start_a_word() {
        assert_eq!(parse_salary(Some("auto100")), SalaryParse::Unparsable);
        assert_eq!(parse_salary(Some("photo 5000")), SalaryParse::Unparsable);
        assert_eq!(parse_salary(Some("зарплата до 90 000 RUR")), SalaryParse::To(90000));
        assert_eq!(parse_salary(Some("(от 70 000)")), SalaryParse::From(70000));
        assert_eq!(parse_salary(Some("до90000")), SalaryParse::To(90000));
    }

    #[test]
    fn test_not_specified() {
        assert_eq!(parse_salary(Some("не указано")), SalaryParse::NotSpecified);
        assert_eq!(parse_salary(Some(" Не указано ")), SalaryParse::NotSpecified);
        assert_eq!(parse_salary(Some("")), SalaryParse::NotSpecified);
        assert_eq!(parse_salary(None), SalaryParse::NotSpecified);
    }

    #[test]
    fn test_unparsable_is_distinct_from_not_specified() {
        assert_eq!(parse_salary(Some("по договорённости")), SalaryParse::Unparsable);
        assert_eq!(
            parse_salary(Some("от 99999999999999999999999 RUR")),
            SalaryParse::Unparsable
        );
        assert!(salary_bounds(Some("по договорённости")).is_absent());
    }

    #[test]
    fn test_zero_is_a_parsed_value() {
        let bounds = salary_bounds(Some("от 0 RUR"));
        assert_eq!(bounds.lower, Some(0));
        assert_eq!(bounds.average(), Some(0.0));
    }

    #[test]
    fn test_range_wins_over_from() {
        // "от" prefix on a range still yields the range
        assert_eq!(
            parse_salary(Some("от 50,000–70,000 RUR")),
            SalaryParse::Range(50000, 70000)
        );
    }

    #[test]
    fn test_inverted_range_is_not_reordered() {
        let bounds = salary_bounds(Some("120,000–80,000 RUR"));
        assert_eq!(bounds.lower, Some(120000));
        assert_eq!(bounds.upper, Some(80000));
    }

    #[test]
    fn test_range_bounds_are_ordered_for_well_formed_input() {
        for (a, b) in [(1, 2), (30000, 30000), (45000, 90000), (100000, 250000)] {
            let text = format!("{a}–{b} RUR");
            let bounds = salary_bounds(Some(&text));
            assert_eq!(bounds.lower, Some(a));
            assert_eq!(bounds.upper, Some(b));
            assert!(bounds.lower <= bounds.upper);
        }
    }
}
