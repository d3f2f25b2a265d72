use crate::dom::DomTableMatch;
use crate::error::{FleroviumError, Result};
use crate::prediction::wire::TableRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Rows of a table keyed by column header, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<IndexMap<String, String>>,
}

impl TableData {
    /// Build from a grid whose first row holds the headers.
    ///
    /// Empty headers become `column_N`; repeated headers get a `_N` suffix.
    /// Short rows are padded with empty cells.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(header_row) = grid.next() else {
            return Self::default();
        };

        let headers = unique_headers(header_row);
        let rows = grid
            .map(|cells| {
                let mut cells = cells.into_iter();
                headers.iter().map(|header| (header.clone(), cells.next().unwrap_or_default())).collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Build from records; headers come from the first record's keys
    pub fn from_records(records: Vec<TableRecord>) -> Self {
        let headers: Vec<String> = records.first().map(|r| r.keys().cloned().collect()).unwrap_or_default();

        let rows = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(key, value)| {
                        let cell = match value {
                            serde_json::Value::String(text) => text,
                            serde_json::Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (key, cell)
                    })
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every cell of one column, in row order
    pub fn column(&self, header: &str) -> Vec<&str> {
        self.rows.iter().filter_map(|row| row.get(header).map(String::as_str)).collect()
    }
}

fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() { format!("column_{}", i + 1) } else { header.trim().to_string() };

        let mut candidate = base.clone();
        let mut n = 2;
        while headers.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        headers.push(candidate);
    }

    headers
}

/// Turns a matched table element into rows
pub trait TableNormalizer {
    fn normalize(&self, table: &DomTableMatch) -> Result<TableData>;
}

/// Normalizer over the cell text the page reported for each row.
///
/// Whitespace inside a cell, line breaks included, collapses to single spaces.
/// The first row becomes the headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellTextNormalizer;

impl TableNormalizer for CellTextNormalizer {
    fn normalize(&self, table: &DomTableMatch) -> Result<TableData> {
        let grid: Vec<Vec<String>> = table
            .cells
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| row.iter().map(|cell| collapse_whitespace(cell)).collect())
            .collect();

        if grid.is_empty() {
            return Err(FleroviumError::MalformedResponse("Table has no rows".to_string()));
        }

        Ok(TableData::from_grid(grid))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
