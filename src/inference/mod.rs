//! Client side of the external inference service
//!
//! The service receives screenshots by file path and answers with detection,
//! classification and table predictions. [`InferenceService`] is the seam the
//! pipeline depends on; [`InferenceClient`] implements it over HTTP.

pub mod client;
pub mod config;

pub use client::{InferenceClient, encode_path};
pub use config::{DEFAULT_BASE_URL, InferenceConfig};

use crate::dom::TableData;
use crate::error::Result;
use crate::prediction::{PredictionBundle, TableBox, TextRoleScore};
use std::path::Path;

/// Operations offered by the inference service
pub trait InferenceService {
    /// Run the combined detection and classification workflow on a screenshot
    fn detect_and_classify(&self, image: &Path, workflow_id: &str) -> Result<PredictionBundle>;

    /// Detect candidate table regions on a screenshot
    fn detect_tables(&self, image: &Path, model_id: &str) -> Result<Vec<TableBox>>;

    /// Score every fragment against the known form roles, in one request
    fn classify_texts(&self, fragments: &[String]) -> Result<Vec<TextRoleScore>>;

    /// Read a table straight from the screenshot pixels
    fn recognize_table(&self, image: &Path) -> Result<TableData>;
}
