//! Per-diagnostic enrichment applied to report streams before display.
//!
//! Sits between the validators and the renderer. Most diagnostics pass
//! through untouched; the duplicate-constraint family gets special handling:
//! the superseded list variant is dropped, and the current variant is
//! enriched with a description of each offending constraint, fetched from
//! the constraint configuration at most once per session. Enrichment is
//! best-effort by contract: a failed fetch degrades to a bare id list on the
//! side channel and never disturbs the primary report flow.

use std::io::Write;

use crate::core::constraints::{CibConstraints, ConstraintFetchError, ConstraintSource};
use crate::core::output;
use crate::core::reports::{ReportItem, ReportMessage};

pub struct ReportPreprocessor<'a, W: Write> {
    source: &'a dyn ConstraintSource,
    sink: W,
    constraints: Option<CibConstraints>,
}

impl<'a, W: Write> ReportPreprocessor<'a, W> {
    pub fn new(source: &'a dyn ConstraintSource, sink: W) -> Self {
        ReportPreprocessor {
            source,
            sink,
            constraints: None,
        }
    }

    /// Transform one diagnostic: `None` drops it, `Some` forwards it to the
    /// renderer. Side text, if any, is written to the sink first so it
    /// appears ahead of the primary report line.
    pub fn process(&mut self, item: ReportItem) -> Option<ReportItem> {
        match &item.message {
            ReportMessage::DuplicateConstraintsList { .. } => return None,
            ReportMessage::DuplicateConstraintsExist { constraint_ids } => {
                let duplicate_ids = constraint_ids.clone();
                self.describe_duplicates(&duplicate_ids);
            }
            _ => {}
        }
        Some(item)
    }

    fn describe_duplicates(&mut self, duplicate_ids: &[String]) {
        // Only a successful fetch is cached; a failed one may be retried by
        // a later diagnostic.
        let config = match self.constraints.take() {
            Some(config) => config,
            None => match self.source.constraint_config(false) {
                Ok(config) => config,
                Err(fetch_error) => {
                    self.describe_fallback(&fetch_error, duplicate_ids);
                    return;
                }
            },
        };

        self.emit("Duplicate constraints:");
        for constraint in &config.location {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.location_set {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.colocation {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.colocation_set {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.order {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.order_set {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.ticket {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        for constraint in &config.ticket_set {
            if duplicate_ids.contains(&constraint.constraint_id) {
                self.emit_indented(&constraint.to_text(true));
            }
        }
        self.constraints = Some(config);
    }

    /// Degraded output when the constraint configuration is unavailable:
    /// whatever partial output the failure carried, its embedded reports,
    /// and a bare line listing the duplicate ids.
    fn describe_fallback(&mut self, fetch_error: &ConstraintFetchError, duplicate_ids: &[String]) {
        if let Some(raw_output) = &fetch_error.output {
            self.emit(raw_output);
        }
        for report in &fetch_error.reports {
            let line = output::render_report(report);
            self.emit(&line);
        }
        self.emit(&format!(
            "Duplicate constraints: {}",
            output::format_list(duplicate_ids)
        ));
    }

    // The side channel is diagnostic-only; a write failure must not break
    // the primary report stream.
    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.sink, "{line}");
    }

    fn emit_indented(&mut self, lines: &[String]) {
        for line in output::indent(lines) {
            self.emit(&line);
        }
    }
}
