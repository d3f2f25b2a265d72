//! Mapping screen coordinates back into the live DOM
//!
//! This module provides:
//! - DomTableMatch: the table element found under a coordinate
//! - DomTableLookup: how the table resolver asks the page for that element
//! - TableData / TableNormalizer: turning the matched table into rows

pub mod normalize;

pub use normalize::{CellTextNormalizer, TableData, TableNormalizer};

use crate::browser::PageDriver;
use crate::error::{FleroviumError, Result};
use crate::prediction::TargetCoordinate;
use serde::{Deserialize, Serialize};

/// The nearest table ancestor of the element rendered at a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomTableMatch {
    /// Lower-case tag name, normally "table"
    pub tag_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw `class` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    pub outer_html: String,

    /// Text of every `th`/`td` per row, line breaks kept as `\n`
    #[serde(default)]
    pub cells: Vec<Vec<String>>,
}

impl DomTableMatch {
    pub fn new(outer_html: impl Into<String>) -> Self {
        Self {
            tag_name: "table".to_string(),
            id: None,
            class_name: None,
            outer_html: outer_html.into(),
            cells: Vec::new(),
        }
    }

    /// Builder method: set id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set class attribute
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Builder method: append a row of cell text
    pub fn with_row(mut self, cells: &[&str]) -> Self {
        self.cells.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Individual classes of the element, in attribute order
    pub fn classes(&self) -> Vec<&str> {
        self.class_name.as_deref().map(|c| c.split_whitespace().collect()).unwrap_or_default()
    }
}

/// Finds the table element containing a screen coordinate
pub trait DomTableLookup {
    /// `Ok(None)` when no table encloses the element at `point`
    fn table_at(&self, point: TargetCoordinate) -> Result<Option<DomTableMatch>>;
}

/// [`DomTableLookup`] that evaluates a script in the page
pub struct ScriptTableLookup<'a> {
    driver: &'a dyn PageDriver,
}

impl<'a> ScriptTableLookup<'a> {
    pub fn new(driver: &'a dyn PageDriver) -> Self {
        Self { driver }
    }
}

impl DomTableLookup for ScriptTableLookup<'_> {
    fn table_at(&self, point: TargetCoordinate) -> Result<Option<DomTableMatch>> {
        find_table_at(self.driver, point)
    }
}

/// Walk up from the topmost element at `point` to the nearest table ancestor
pub fn find_table_at(driver: &dyn PageDriver, point: TargetCoordinate) -> Result<Option<DomTableMatch>> {
    if !point.is_finite() {
        return Err(FleroviumError::InvalidCoordinate(format!("cannot look up table at {}", point)));
    }

    let script = format!("{}({}, {})", include_str!("table_at_point.js").trim_end(), point.x, point.y);

    let value = driver
        .evaluate(&script)?
        .ok_or_else(|| FleroviumError::EvaluationFailed("No value returned from table lookup".to_string()))?;

    // The script returns a JSON string so the value survives the protocol round trip
    let json_str: String = serde_json::from_value(value)
        .map_err(|e| FleroviumError::EvaluationFailed(format!("Table lookup did not return a string: {}", e)))?;

    let found: Option<DomTableMatch> = serde_json::from_str(&json_str)
        .map_err(|e| FleroviumError::EvaluationFailed(format!("Failed to parse table lookup result: {}", e)))?;

    match &found {
        Some(table) => log::info!(
            "Point {} is inside a <{}> ({} rows, {} bytes)",
            point,
            table.tag_name,
            table.cells.len(),
            table.outer_html.len()
        ),
        None => log::info!("Point {} is not inside a table", point),
    }

    Ok(found)
}
