// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use herald_core::{ReportField, RunReport, RunStatus};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

const FIELDS: [ReportField; 3] = [ReportField::Name, ReportField::Progress, ReportField::Minutes];

/// Render a report as a plain table headed by the run title and its status.
///
/// Columns are padded to their widest cell; missing values show as `-`.
pub fn format_report(title: &str, report: &RunReport) -> String {
    let rows: Vec<[String; 3]> = std::iter::once(FIELDS.map(|f| f.to_string()))
        .chain(report.iter().map(|step| FIELDS.map(|f| step.display(f))))
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!("{title}: {}\n", RunStatus::classify(report));
    for row in &rows {
        let line = format!(
            "{:<w0$}  {:<w1$}  {}",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1]
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
