// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser for the execution engine's on-disk metadata tables.
//!
//! Both `meta/progress` and `meta/meta` are pipe-delimited text with a
//! header row. Tables are append-only, so a later row for the same name
//! supersedes earlier ones.

use herald_core::{RunReport, StepProgress, StepResult};
use std::collections::HashMap;
use thiserror::Error;

const SEPARATOR: char = '|';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetaError {
    #[error("{table}: empty table (no header row)")]
    Empty { table: &'static str },
    #[error("{table}: missing column {column}")]
    MissingColumn { table: &'static str, column: &'static str },
    #[error("{table}: line {line} has {found} fields, expected at least {expected}")]
    ShortRow { table: &'static str, line: usize, found: usize, expected: usize },
}

struct Table<'a> {
    name: &'static str,
    header: Vec<&'a str>,
    rows: Vec<(usize, Vec<&'a str>)>,
}

impl<'a> Table<'a> {
    fn parse(name: &'static str, text: &'a str) -> Result<Self, MetaError> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let (_, header) = lines.next().ok_or(MetaError::Empty { table: name })?;
        let header = header.split(SEPARATOR).map(str::trim).collect();
        let rows = lines
            .map(|(i, line)| (i + 1, line.split(SEPARATOR).map(str::trim).collect()))
            .collect();
        Ok(Self { name, header, rows })
    }

    fn column(&self, column: &'static str) -> Result<usize, MetaError> {
        self.header
            .iter()
            .position(|h| *h == column)
            .ok_or(MetaError::MissingColumn { table: self.name, column })
    }

    /// Latest value of `value_col` per `key_col`, keys in first-seen order.
    fn latest(
        &self,
        key_col: &'static str,
        value_col: &'static str,
    ) -> Result<Vec<(&'a str, &'a str)>, MetaError> {
        let key = self.column(key_col)?;
        let value = self.column(value_col)?;
        let expected = key.max(value) + 1;

        let mut order: Vec<(&str, &str)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (line, fields) in &self.rows {
            if fields.len() < expected {
                return Err(MetaError::ShortRow {
                    table: self.name,
                    line: *line,
                    found: fields.len(),
                    expected,
                });
            }
            let (k, v) = (fields[key], fields[value]);
            match index.get(k) {
                Some(&i) => order[i].1 = v,
                None => {
                    index.insert(k, order.len());
                    order.push((k, v));
                }
            }
        }
        Ok(order)
    }
}

/// Join the progress table with timings from the meta table.
///
/// Seconds are attached to completed steps only; unparsable or `NA`
/// timings are treated as absent.
pub fn parse_report(progress: &str, meta: Option<&str>) -> Result<RunReport, MetaError> {
    let steps = Table::parse("progress", progress)?.latest("name", "progress")?;

    let seconds: HashMap<&str, f64> = match meta {
        Some(text) => Table::parse("meta", text)?
            .latest("name", "seconds")?
            .into_iter()
            .filter_map(|(name, raw)| raw.parse::<f64>().ok().filter(|s| s.is_finite()).map(|s| (name, s)))
            .collect(),
        None => HashMap::new(),
    };

    Ok(steps
        .into_iter()
        .map(|(name, raw)| {
            let progress = StepProgress::from(raw);
            let seconds = match progress {
                StepProgress::Completed => seconds.get(name).copied(),
                _ => None,
            };
            StepResult { name: name.to_string(), progress, seconds }
        })
        .collect())
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
