use crate::error::Result;
use crate::page::Affordance;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the fill_field tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FillFieldParams {
    /// Role of the field, e.g. "username" or "password"
    pub label: String,

    /// Workflow id used for detection and text extraction
    pub model: String,

    /// Text to type into the field
    pub text: String,
}

/// Tool for typing into a form field found by the role of its text
#[derive(Default)]
pub struct FillFieldTool;

impl Tool for FillFieldTool {
    type Params = FillFieldParams;

    fn name(&self) -> &str {
        "fill_field"
    }

    fn description(&self) -> &str {
        "Find the input whose text best matches a role, click it and type into it"
    }

    fn execute_typed(&self, params: FillFieldParams, context: &mut ToolContext) -> Result<ToolResult> {
        let affordance = Affordance::input(params.label, params.model);
        let point = context.page.fill(&affordance, &params.text)?;

        // Typed text may be a credential; report only its length
        Ok(ToolResult::success_with(serde_json::json!({
            "label": affordance.label,
            "x": point.x,
            "y": point.y,
            "typed_chars": params.text.chars().count()
        })))
    }
}
