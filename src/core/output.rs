//! Text rendering helpers for report streams and CLI surfaces.
//!
//! Keeps diagnostic output bounded and consistent: quoted name lists are
//! always sorted, indentation uses a fixed step, and every report renders to
//! a single severity-prefixed line.

use crate::core::reports::{ReportItem, Severity};

/// Indentation applied to secondary diagnostic lines.
pub const INDENT_STEP: usize = 2;

/// Quote, sort, and comma-join a list of names for display.
pub fn format_list(items: &[String]) -> String {
    let mut quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    quoted.sort();
    quoted.join(", ")
}

/// Prefix every non-empty line with one indentation step.
pub fn indent(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                line.clone()
            } else {
                format!("{}{}", " ".repeat(INDENT_STEP), line)
            }
        })
        .collect()
}

pub fn plural_s(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Turn a payload type token (`property_set`) into a display label.
pub fn type_label(token: &str) -> String {
    token.replace('_', " ")
}

/// Render one report to a severity-prefixed line. Forceable errors carry a
/// hint about the override flag.
pub fn render_report(item: &ReportItem) -> String {
    let prefix = match item.severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };
    let mut line = format!("{}: {}", prefix, item.message.text());
    if item.severity == Severity::Error && item.force_code.is_some() {
        line.push_str(", use --force to override");
    }
    line
}
