//! Marker listing and the closing summary line

use crate::analysis::{Marker, MarkerReport};

const INDENT: &str = "  ";

/// Counts that decide which summary is printed
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryCounts {
    pub errors: usize,
    pub warnings: usize,
    /// Errors that carry a suggestion, counted whether or not it was printed
    pub error_suggestions: usize,
    /// Any service group, deployment pipeline or image pipeline was displayed
    pub has_groups: bool,
    pub suggest: bool,
}

/// Append the errors and warnings sections, returning the summary counts
pub fn render_markers(
    out: &mut Vec<String>,
    report: &MarkerReport,
    suggest: bool,
    has_groups: bool,
) -> SummaryCounts {
    let mut error_suggestions = 0;
    if !report.errors.is_empty() {
        out.push("Errors:".to_string());
        for marker in &report.errors {
            out.push(format!("{}* {}", INDENT, marker.message));
            if marker.suggestion.as_deref().is_some_and(|s| !s.is_empty()) {
                error_suggestions += 1;
                if suggest {
                    push_suggestion(out, marker);
                }
            }
        }
    }

    if suggest && !report.warnings.is_empty() {
        out.push("Warnings:".to_string());
        for marker in &report.warnings {
            out.push(format!("{}* {}", INDENT, marker.message));
            push_suggestion(out, marker);
        }
    }

    if !report.errors.is_empty() || (suggest && !report.warnings.is_empty()) {
        out.push(String::new());
    }

    SummaryCounts {
        errors: report.errors.len(),
        warnings: report.warnings.len(),
        error_suggestions,
        has_groups,
        suggest,
    }
}

fn push_suggestion(out: &mut Vec<String>, marker: &Marker) {
    match marker.suggestion.as_deref() {
        Some(s) if s.contains('\n') => {
            out.push(String::new());
            for line in s.split('\n') {
                out.push(format!("{}  {}", INDENT, line));
            }
        }
        Some(s) if !s.is_empty() => out.push(format!("{}  try: {}", INDENT, s)),
        _ => {}
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// The closing lines of a report
pub fn summary_lines(counts: &SummaryCounts, cli_name: &str) -> Vec<String> {
    let errors = plural(counts.errors, "error");
    let warnings = plural(counts.warnings, "warning");
    let details = format!("use '{} status -v' to see details.", cli_name);

    let quiet = !counts.suggest;
    if quiet && counts.errors > 0 && counts.warnings > 0 {
        vec![format!("{} and {} identified, {}", errors, warnings, details)]
    } else if quiet && counts.errors > 0 && counts.error_suggestions > 0 {
        vec![format!("{} identified, {}", errors, details)]
    } else if quiet && counts.warnings > 0 {
        vec![format!("{} identified, {}", warnings, details)]
    } else if !counts.has_groups {
        vec![
            "You have no services, deployment configs, or build configs.".to_string(),
            format!("Run '{} new-app' to create an application.", cli_name),
        ]
    } else {
        vec![format!(
            "View details with '{cli} describe <resource>/<name>' or list everything with '{cli} get all'.",
            cli = cli_name
        )]
    }
}
