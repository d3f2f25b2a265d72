//! Turning model output into something a browser can act on
//!
//! - types: detections, classification summaries, table boxes, coordinates
//! - wire: the JSON shapes of the inference service
//! - label: resolve a semantic label ("login") to a pixel
//! - form: resolve a fillable field from text-role scores
//! - table: choose a table box and map it to a DOM table

pub mod form;
pub mod label;
pub mod table;
pub mod types;
pub mod wire;

pub use form::{FRAGMENT_DELIMITER, highest_probability_index, join_fragments, resolve_form_field};
pub use label::{LabelResolution, ResolutionSource, resolve_label};
pub use table::{ResolvedTable, TableLocator, resolve_table, select_top_table};
pub use types::{
    ClassificationSummary, Detection, ImageSize, PredictionBundle, RankedClass, Region, TableBox, TargetCoordinate,
    TextRoleScore, Visualization,
};
