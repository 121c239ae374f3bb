//! Output module
//!
//! Renders user records for the terminal.
//!
//! # Overview
//!
//! This module provides:
//! - `OutputFormat` - table or JSON
//! - `UserRow` - the five display columns read from a schemaless record
//! - `Formatter` - renders a record list in the chosen format

use crate::fields;
use crate::types::UserRecord;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column headers of the table output
pub const TABLE_HEADERS: [&str; 5] = ["ID", "Email", "Name", "Region", "Status"];

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
}

/// Display columns of one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub region: String,
    pub status: String,
}

impl UserRow {
    /// Read the display columns from a record; missing fields are blank
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: fields::id(record).unwrap_or_default(),
            email: fields::email(record).unwrap_or_default(),
            name: fields::name(record).unwrap_or_default(),
            region: fields::region(record).unwrap_or_default(),
            status: fields::status(record).unwrap_or_default(),
        }
    }

    fn cells(&self) -> [&str; 5] {
        [&self.id, &self.email, &self.name, &self.region, &self.status]
    }
}

/// Formats user records for output
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a list of records
    pub fn format_users(&self, records: &[UserRecord]) -> String {
        match self.format {
            OutputFormat::Json => self.json_users(records),
            OutputFormat::Table => self.table_users(records),
        }
    }

    /// Closing summary line
    pub fn summary(&self, total: usize, regions_covered: usize) -> String {
        format!("Total users: {total} (regions covered: {regions_covered})")
    }

    fn json_users(&self, records: &[UserRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    fn table_users(&self, records: &[UserRecord]) -> String {
        if records.is_empty() {
            return "No users found.".to_string();
        }

        let rows: Vec<UserRow> = records.iter().map(UserRow::from_record).collect();

        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(render_line(TABLE_HEADERS, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &rows {
            lines.push(render_line(row.cells(), &widths));
        }

        lines.join("\n")
    }
}

fn render_line(cells: [&str; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
