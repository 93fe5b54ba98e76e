//! Batch statistics and the final human-readable conversion report.
//!
//! The report has a single logical writer: the orchestrator's collection
//! loop appends outcomes as they complete, so no internal synchronization
//! is needed. Rendering is a presentation detail; nothing parses the text
//! back.

use chrono::{DateTime, Utc};

/// How many successful files the "converted without retries" section lists
/// before truncating.
const PLAIN_SUCCESS_DISPLAY_CAP: usize = 10;

/// Aggregate counters derived from a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub retried_count: usize,
    pub duration_seconds: f64,
}

/// Accumulates per-file outcomes for one batch run.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    total: usize,
    successes: Vec<String>,
    failures: Vec<(String, String)>,
    retried: Vec<(String, u32)>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl ConversionReport {
    /// Creates a report for a batch of `total` files and starts the clock.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            successes: Vec::new(),
            failures: Vec::new(),
            retried: Vec::new(),
            started_at: Some(Utc::now()),
            finished_at: None,
        }
    }

    /// Records a successful conversion. Append-only.
    pub fn record_success(&mut self, name: &str) {
        self.successes.push(name.to_string());
    }

    /// Records a failed conversion with its cause. Append-only.
    pub fn record_failure(&mut self, name: &str, error: &str) {
        self.failures.push((name.to_string(), error.to_string()));
    }

    /// Records that a success needed `attempts` attempts. The caller pairs
    /// this with `record_success` and only for `attempts > 1`.
    pub fn record_retry(&mut self, name: &str, attempts: u32) {
        self.retried.push((name.to_string(), attempts));
    }

    /// Stops the clock. Idempotent; called on every exit path of a run.
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    pub fn retried(&self) -> &[(String, u32)] {
        &self.retried
    }

    /// Current aggregate counts. Safe to call mid-run for a partial view.
    pub fn summary(&self) -> ReportSummary {
        let duration_seconds = match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => {
                let millis = end.signed_duration_since(start).num_milliseconds();
                (millis.max(0) as f64) / 1000.0
            }
            _ => 0.0,
        };
        ReportSummary {
            total: self.total,
            success_count: self.successes.len(),
            failed_count: self.failures.len(),
            retried_count: self.retried.len(),
            duration_seconds,
        }
    }

    /// Renders the full multi-section report as plain text.
    pub fn render(&self) -> String {
        let summary = self.summary();
        // Guard the percentage division only; the displayed total stays real.
        let percent_base = if self.total == 0 { 1 } else { self.total } as f64;
        let success_pct = summary.success_count as f64 / percent_base * 100.0;
        let failed_pct = summary.failed_count as f64 / percent_base * 100.0;
        let duration_min = (summary.duration_seconds / 60.0) as u64;
        let duration_sec = (summary.duration_seconds % 60.0) as u64;

        let sep = "=".repeat(72);
        let sub = "-".repeat(72);
        let mut lines: Vec<String> = Vec::new();

        lines.push(sep.clone());
        lines.push("DOCUMENT CONVERSION REPORT".to_string());
        lines.push(sep.clone());
        lines.push(String::new());
        lines.push("OVERALL SUMMARY".to_string());
        lines.push(sub.clone());
        lines.push(format!("{:<36}{}", "Total files processed:", summary.total));
        lines.push(format!(
            "{:<36}{} ({:.1}%)",
            "Converted successfully:", summary.success_count, success_pct
        ));
        lines.push(format!(
            "{:<36}{} ({:.1}%)",
            "Failed:", summary.failed_count, failed_pct
        ));
        lines.push(format!(
            "{:<36}{}",
            "Files that needed retries:", summary.retried_count
        ));
        lines.push(format!(
            "{:<36}{}m {}s",
            "Total time:", duration_min, duration_sec
        ));
        lines.push(String::new());

        if !self.retried.is_empty() {
            lines.push("RESOLVED AFTER RETRIES".to_string());
            lines.push(sub.clone());
            for (name, attempts) in &self.retried {
                lines.push(format!("  * {}", name));
                lines.push(format!("    resolved after {} attempt(s)", attempts));
            }
            lines.push(String::new());
        }

        if !self.successes.is_empty() && self.retried.is_empty() {
            lines.push("CONVERTED WITHOUT RETRIES".to_string());
            lines.push(sub.clone());
            for name in self.successes.iter().take(PLAIN_SUCCESS_DISPLAY_CAP) {
                lines.push(format!("  * {}", name));
            }
            if self.successes.len() > PLAIN_SUCCESS_DISPLAY_CAP {
                lines.push(format!(
                    "  ... and {} more",
                    self.successes.len() - PLAIN_SUCCESS_DISPLAY_CAP
                ));
            }
            lines.push(String::new());
        }

        if !self.failures.is_empty() {
            lines.push("UNRESOLVED FAILURES".to_string());
            lines.push(sub.clone());
            for (name, error) in &self.failures {
                lines.push(format!("  * {}", name));
                lines.push(format!("    error: {}", error));
                lines.push("    suggestions:".to_string());
                lines.push("      - check that the document is not corrupt".to_string());
                lines.push(
                    "      - check that the converter tool is installed and on PATH".to_string(),
                );
                lines.push("      - open and re-save the document, then try again".to_string());
            }
            lines.push(String::new());
        }

        lines.push(sep.clone());
        if summary.failed_count == 0 && summary.success_count > 0 {
            lines.push("ALL FILES CONVERTED SUCCESSFULLY".to_string());
        } else if summary.success_count > 0 {
            lines.push("COMPLETED WITH SOME FAILURES".to_string());
        } else {
            lines.push("NO FILES COULD BE CONVERTED".to_string());
        }
        lines.push(sep);

        lines.join("\n")
    }

    #[cfg(test)]
    fn set_window(&mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
    }
}
