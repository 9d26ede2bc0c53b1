// src/utils/log.rs

//! Structured console sections for pipeline output.
//!
//! Thin helpers over the `log` facade so headers, steps and summaries
//! share one layout. Level filtering and timestamps come from whichever
//! logger the binary installs.

const RULE_WIDTH: usize = 60;

/// Log an info message
pub fn info(message: &str) {
    ::log::info!("{}", message);
}

/// Log a warning message
pub fn warn(message: &str) {
    ::log::warn!("{}", message);
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a separator line
pub fn separator() {
    ::log::info!("{}", "─".repeat(RULE_WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    ::log::info!("{}", border);
    ::log::info!("  {}", title);
    ::log::info!("{}", border);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    ::log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    ::log::info!("[SUMMARY] {}", title);
    for line in summary_lines(items) {
        ::log::info!("{}", line);
    }
}

/// Aligned `key: value` lines for a summary block.
fn summary_lines(items: &[(&str, String)]) -> Vec<String> {
    let width = items
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    items
        .iter()
        .map(|(key, value)| {
            let pad = width - key.chars().count();
            format!("    {}:{} {}", key, " ".repeat(pad), value)
        })
        .collect()
}

/// Format a float with thousands separators and no decimals.
pub fn money(value: f64) -> String {
    super::group_digits(value.round() as i64, ' ')
}

/// Format an optional percentage delta, `n/a` when undefined.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |p| format!("{:+.1}%", p))
}
