use crate::dom::{DomTableLookup, DomTableMatch, TableData, TableNormalizer};
use crate::error::{FleroviumError, Result};
use crate::prediction::types::{TableBox, TargetCoordinate};
use std::fmt;

/// Best-effort descriptor for re-finding a table in the DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLocator {
    /// `#id`
    Id(String),
    /// `.a.b.c`, built from the full class list
    Classes(Vec<String>),
    /// Bare tag name; matches every table on the page
    Tag(String),
}

impl TableLocator {
    /// Prefer the id, then the class list, then the tag
    pub fn derive(table: &DomTableMatch) -> Self {
        if let Some(id) = table.id.as_deref().filter(|id| !id.is_empty()) {
            return TableLocator::Id(id.to_string());
        }

        let classes = table.classes();
        if !classes.is_empty() {
            return TableLocator::Classes(classes.into_iter().map(str::to_string).collect());
        }

        TableLocator::Tag(table.tag_name.clone())
    }

    /// Whether the locator can only match one element on a well-formed page
    pub fn is_unique(&self) -> bool {
        matches!(self, TableLocator::Id(_))
    }
}

impl fmt::Display for TableLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLocator::Id(id) => write!(f, "#{}", css_escape(id)),
            TableLocator::Classes(classes) => {
                for class in classes {
                    write!(f, ".{}", css_escape(class))?;
                }
                Ok(())
            }
            TableLocator::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Escape an identifier for use in a selector, following `CSS.escape`
fn css_escape(ident: &str) -> String {
    let mut escaped = String::with_capacity(ident.len());
    let first_is_dash = ident.starts_with('-');

    for (i, c) in ident.chars().enumerate() {
        match c {
            '\0' => escaped.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => escaped.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if i == 0 || (i == 1 && first_is_dash) => escaped.push_str(&format!("\\{:x} ", c as u32)),
            '-' if i == 0 && ident.len() == 1 => escaped.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => escaped.push(c),
            c => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }

    escaped
}

/// A detected table matched in the DOM and normalized
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub locator: TableLocator,
    pub raw_markup: String,
    pub normalized_rows: TableData,
    /// Center of the chosen table box
    pub coordinate: TargetCoordinate,
    pub confidence: f64,
}

/// Most confident box; the earliest one wins an exact tie
pub fn select_top_table(boxes: &[TableBox]) -> Option<&TableBox> {
    boxes.iter().reduce(|highest, current| if current.confidence > highest.confidence { current } else { highest })
}

/// Pick the top table box, find its table in the DOM and normalize it
pub fn resolve_table(
    boxes: &[TableBox],
    lookup: &dyn DomTableLookup,
    normalizer: &dyn TableNormalizer,
) -> Result<ResolvedTable> {
    let top = select_top_table(boxes).ok_or(FleroviumError::NoPredictions)?;
    let coordinate = top.center();

    log::debug!("Top table box at {} (confidence {}) out of {}", coordinate, top.confidence, boxes.len());

    let table = lookup
        .table_at(coordinate)?
        .ok_or(FleroviumError::NoTableFound { x: coordinate.x, y: coordinate.y })?;

    let locator = TableLocator::derive(&table);
    if !locator.is_unique() {
        log::warn!("Table at {} has no id, locator '{}' may match other tables", coordinate, locator);
    }
    log::info!("Table locator: document.querySelector({})", serde_json::Value::String(locator.to_string()));

    let normalized_rows = normalizer.normalize(&table)?;

    Ok(ResolvedTable {
        locator,
        raw_markup: table.outer_html,
        normalized_rows,
        coordinate,
        confidence: top.confidence,
    })
}
