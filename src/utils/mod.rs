// src/utils/mod.rs

//! Utility functions and helpers.

pub mod delimited;
pub mod http;
pub mod log;

/// Format an integer with `sep` between groups of three digits.
pub fn group_digits(value: i64, sep: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(80000, ','), "80,000");
        assert_eq!(group_digits(1234567, ' '), "1 234 567");
        assert_eq!(group_digits(-5000, ' '), "-5 000");
        assert_eq!(group_digits(i64::MIN, ','), "-9,223,372,036,854,775,808");
    }
}
