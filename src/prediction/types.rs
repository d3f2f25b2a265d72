use crate::error::{FleroviumError, Result};
use crate::prediction::wire::{ClassificationPrediction, WorkflowResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel position in screenshot space, the output of every resolution path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetCoordinate {
    pub x: f64,
    pub y: f64,
}

impl TargetCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both axes are real numbers (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for TargetCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One object-detection box. `(x, y)` is the box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub confidence: f64,
    #[serde(default)]
    pub class_id: i64,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub detection_id: String,
    #[serde(default)]
    pub parent_id: String,
}

impl Detection {
    /// Create a detection centered at `(x, y)` with full confidence
    pub fn new(class_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: 0.0,
            height: 0.0,
            confidence: 1.0,
            class_id: 0,
            class_name: class_name.into(),
            detection_id: String::new(),
            parent_id: String::new(),
        }
    }

    /// Builder method: set confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builder method: set box size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn center(&self) -> TargetCoordinate {
        TargetCoordinate::new(self.x, self.y)
    }
}

/// One entry of a classifier's ranked output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedClass {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub class_id: i64,
    pub confidence: f64,
}

/// Classifier output for the region of one detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub ranked_classes: Vec<RankedClass>,
    pub top_class: String,
    pub top_confidence: f64,

    /// Text recognised inside the region, if the workflow produced any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ClassificationSummary {
    pub fn new(top_class: impl Into<String>) -> Self {
        Self {
            ranked_classes: Vec::new(),
            top_class: top_class.into(),
            top_confidence: 1.0,
            text: None,
        }
    }

    /// Builder method: set the recognised text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set the ranked class list
    pub fn with_ranked_classes(mut self, ranked_classes: Vec<RankedClass>) -> Self {
        self.ranked_classes = ranked_classes;
        self
    }
}

impl From<ClassificationPrediction> for ClassificationSummary {
    fn from(prediction: ClassificationPrediction) -> Self {
        let text = prediction.result.map(|value| match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });

        Self {
            ranked_classes: prediction.predictions.predictions,
            top_class: prediction.predictions.top,
            top_confidence: prediction.predictions.confidence,
            text,
        }
    }
}

/// A detection paired with the classification of the same visual region
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub detection: Detection,
    pub classification: ClassificationSummary,
}

impl Region {
    pub fn new(detection: Detection, classification: ClassificationSummary) -> Self {
        Self { detection, classification }
    }
}

/// Dimensions of the image the predictions were computed on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Rendered visualization attached to a workflow response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

/// One inference response: regions in detection order plus metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionBundle {
    regions: Vec<Region>,
    image: Option<ImageSize>,
    visualization: Option<Visualization>,
}

impl PredictionBundle {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions, image: None, visualization: None }
    }

    /// Pair two parallel lists. They must have the same length.
    pub fn from_parts(detections: Vec<Detection>, classifications: Vec<ClassificationSummary>) -> Result<Self> {
        if detections.len() != classifications.len() {
            return Err(FleroviumError::MalformedResponse(format!(
                "{} detections but {} classification summaries",
                detections.len(),
                classifications.len()
            )));
        }

        let regions = detections
            .into_iter()
            .zip(classifications)
            .map(|(detection, classification)| Region::new(detection, classification))
            .collect();

        Ok(Self::new(regions))
    }

    /// Build the bundle from a workflow response list. Only the first entry is used.
    pub fn from_responses(responses: Vec<WorkflowResult>) -> Result<Self> {
        if responses.len() > 1 {
            log::debug!("Workflow returned {} results, using the first", responses.len());
        }

        let first = responses.into_iter().next().ok_or(FleroviumError::NoPredictions)?;

        let page = first.model_predictions.and_then(|m| m.predictions).ok_or(FleroviumError::NoPredictions)?;
        if page.predictions.is_empty() {
            return Err(FleroviumError::NoPredictions);
        }

        let classifications = first.model_1.into_iter().map(ClassificationSummary::from).collect();
        let mut bundle = Self::from_parts(page.predictions, classifications)?;
        bundle.image = page.image;
        bundle.visualization = first.bounding_box_visualization;

        Ok(bundle)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn image(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn visualization(&self) -> Option<&Visualization> {
        self.visualization.as_ref()
    }

    /// Text of every region in detection order, empty where none was recognised
    pub fn text_fragments(&self) -> Vec<String> {
        self.regions
            .iter()
            .map(|region| region.classification.text.clone().unwrap_or_default())
            .collect()
    }
}

/// Probability that a text fragment plays a form role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRoleScore {
    pub text: String,
    #[serde(rename = "label")]
    pub role: String,
    pub probability: f64,
}

impl TextRoleScore {
    pub fn new(text: impl Into<String>, role: impl Into<String>, probability: f64) -> Self {
        Self { text: text.into(), role: role.into(), probability }
    }
}

/// Candidate table region from the table detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBox {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub confidence: f64,
    #[serde(rename = "class", default)]
    pub class_name: String,
}

impl TableBox {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, width: 0.0, height: 0.0, confidence, class_name: "table".to_string() }
    }

    pub fn center(&self) -> TargetCoordinate {
        TargetCoordinate::new(self.x, self.y)
    }
}
