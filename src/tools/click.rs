use crate::error::Result;
use crate::page::{Affordance, AffordanceKind};
use crate::prediction::ResolutionSource;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the click_label tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickLabelParams {
    /// Semantic label of the target, e.g. "login"
    pub label: String,

    /// Workflow id used for detection and classification
    pub model: String,

    /// Kind of element being clicked (default: button)
    #[serde(default)]
    pub kind: ClickTarget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    #[default]
    Button,
    Input,
}

/// Tool for clicking an element found by its predicted label
#[derive(Default)]
pub struct ClickLabelTool;

impl Tool for ClickLabelTool {
    type Params = ClickLabelParams;

    fn name(&self) -> &str {
        "click_label"
    }

    fn description(&self) -> &str {
        "Screenshot the page, find the element with the given label and click it"
    }

    fn execute_typed(&self, params: ClickLabelParams, context: &mut ToolContext) -> Result<ToolResult> {
        let kind = match params.kind {
            ClickTarget::Button => AffordanceKind::Button,
            ClickTarget::Input => AffordanceKind::Input,
        };
        let affordance = Affordance::new(kind, params.label, params.model);

        let resolution = context.page.click(&affordance)?;

        let source = match resolution.source {
            ResolutionSource::Detection { .. } => "detection",
            ResolutionSource::Classification => "classification",
        };

        Ok(ToolResult::success_with(serde_json::json!({
            "label": affordance.label,
            "x": resolution.coordinate.x,
            "y": resolution.coordinate.y,
            "index": resolution.index,
            "source": source,
            "classification_agrees": resolution.classification_agrees()
        })))
    }
}
