//! List output shared by every `list` command
//!
//! Commands describe their columns once and hand rows to [`TableFormatter`],
//! which renders them as a table, TSV, CSV or bare ids.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::io;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{format_short_id, truncate_str};
use crate::cli::OutputFormat;
use crate::core::identity::EntityId;

/// One column a list command can show
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Truncation width in table output
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Id(EntityId),
    OptId(Option<EntityId>),
    Number(u32),
    Date(DateTime<Utc>),
    Day(Option<NaiveDate>),
}

impl CellValue {
    /// Full value for machine-readable formats
    fn plain(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Id(id) => id.to_string(),
            CellValue::OptId(id) => id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Day(d) => d.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    /// Shortened value for the table
    fn display(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format_short_id(id),
            CellValue::OptId(Some(id)) => format_short_id(id),
            CellValue::OptId(None) | CellValue::Day(None) => "-".to_string(),
            CellValue::Text(s) if s.is_empty() => "-".to_string(),
            other => truncate_str(&other.plain(), width),
        }
    }
}

/// A list row keyed by column
#[derive(Debug, Clone)]
pub struct TableRow {
    id: EntityId,
    cells: HashMap<&'static str, CellValue>,
}

impl TableRow {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            cells: HashMap::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.insert(key, value);
        self
    }

    fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }
}

/// Renders rows for one entity type
pub struct TableFormatter {
    columns: &'static [ColumnDef],
    name_plural: &'static str,
}

impl TableFormatter {
    pub fn new(columns: &'static [ColumnDef], name_plural: &'static str) -> Self {
        Self {
            columns,
            name_plural,
        }
    }

    fn visible_columns(&self, visible: &[&str]) -> Vec<&ColumnDef> {
        if visible.is_empty() {
            return self.columns.iter().collect();
        }
        visible
            .iter()
            .filter_map(|key| self.columns.iter().find(|c| c.key == *key))
            .collect()
    }

    /// Write `rows` to stdout in `format`
    ///
    /// `visible` lists column keys; empty means all columns.
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible: &[&str]) -> Result<()> {
        let columns = self.visible_columns(visible);
        match format {
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.id);
                }
            }
            OutputFormat::Tsv => {
                println!(
                    "{}",
                    columns.iter().map(|c| c.header).collect::<Vec<_>>().join("\t")
                );
                for row in rows {
                    let line: Vec<String> = columns
                        .iter()
                        .map(|c| {
                            row.get(c.key)
                                .map(|v| sanitize_tsv(&v.plain()))
                                .unwrap_or_default()
                        })
                        .collect();
                    println!("{}", line.join("\t"));
                }
            }
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(io::stdout());
                wtr.write_record(columns.iter().map(|c| c.header))
                    .into_diagnostic()?;
                for row in rows {
                    wtr.write_record(
                        columns
                            .iter()
                            .map(|c| row.get(c.key).map(CellValue::plain).unwrap_or_default()),
                    )
                    .into_diagnostic()?;
                }
                wtr.flush().into_diagnostic()?;
            }
            _ => {
                println!("{}", self.render_table(rows, &columns));
                println!(
                    "{} {} found.",
                    style(rows.len()).cyan(),
                    self.name_plural
                );
            }
        }
        Ok(())
    }

    fn render_table(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> String {
        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(columns.iter().map(|c| {
                row.get(c.key)
                    .map(|v| v.display(c.width))
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }
}

fn sanitize_tsv(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}
