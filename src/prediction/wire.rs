//! JSON shapes returned by the inference service.
//!
//! These mirror the service payloads field for field and are converted into
//! the resolution types in [`crate::prediction::types`] before use.

use crate::prediction::types::{Detection, ImageSize, RankedClass, TableBox, Visualization};
use indexmap::IndexMap;
use serde::Deserialize;

/// One element of the combined detect+classify workflow response
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowResult {
    #[serde(default)]
    pub model_predictions: Option<ModelPredictions>,

    #[serde(default)]
    pub bounding_box_visualization: Option<Visualization>,

    /// Per-detection classifier output, aligned by position with the detections
    #[serde(default)]
    pub model_1: Vec<ClassificationPrediction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelPredictions {
    #[serde(default)]
    pub inference_id: Option<String>,

    #[serde(default)]
    pub predictions: Option<DetectionPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionPage {
    #[serde(default)]
    pub image: Option<ImageSize>,

    #[serde(default)]
    pub predictions: Vec<Detection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationPrediction {
    #[serde(default)]
    pub inference_id: Option<String>,

    pub predictions: ClassificationDetail,

    /// Text recognised in the region
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationDetail {
    #[serde(default)]
    pub predictions: Vec<RankedClass>,

    pub top: String,

    #[serde(default)]
    pub confidence: f64,
}

/// Response of the table detector
#[derive(Debug, Clone, Deserialize)]
pub struct TableDetection {
    #[serde(default)]
    pub predictions: Vec<TableBox>,
}

/// Response of the image-only table structure recognizer
#[derive(Debug, Clone, Deserialize)]
pub struct TableRecognition {
    pub success: bool,

    /// Records-oriented JSON, encoded as a string
    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// One record of a recognized table, keyed by column header
pub type TableRecord = IndexMap<String, serde_json::Value>;
