//! Round-trip report table.
//!
//! The report is a markdown table with one row per scenario and a final
//! `Overall` row holding the mean of the scenario averages. Values are
//! seconds with four decimals.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::metrics;
use crate::scenario::ScenarioResult;

/// Table header line.
pub const HEADER: &str = "| Test Case | Average Roundtrip Time (seconds) |";

/// Table separator line.
pub const SEPARATOR: &str = "|-----------|-----------------------------------|";

/// Label of the final row.
pub const OVERALL: &str = "Overall";

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Scenario name.
    pub name: String,
    /// Average round-trip time in seconds.
    pub average_secs: f64,
}

/// Scenario averages in run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Create a report from `(name, average)` rows.
    #[must_use]
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    /// Build a report from scenario results.
    #[must_use]
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        Self::new(
            results
                .iter()
                .map(|r| ReportRow {
                    name: r.name.clone(),
                    average_secs: r.average_secs,
                })
                .collect(),
        )
    }

    /// Scenario rows, without the overall row.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Mean of the scenario averages; zero for an empty report.
    #[must_use]
    pub fn overall(&self) -> f64 {
        let averages: Vec<f64> = self.rows.iter().map(|r| r.average_secs).collect();
        metrics::mean(&averages).unwrap_or(0.0)
    }

    /// Render the table, terminated by a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(128 + 64 * self.rows.len());
        out.push_str(HEADER);
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        for row in &self.rows {
            push_row(&mut out, &row.name, row.average_secs);
        }
        push_row(&mut out, OVERALL, self.overall());
        out
    }

    /// Write the rendered table to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        info!(path = %path.display(), rows = self.rows.len(), "report written");
        Ok(())
    }
}

fn push_row(out: &mut String, name: &str, seconds: f64) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "| {name} | {seconds:.4} |");
}
