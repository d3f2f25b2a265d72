//! Named, JSON-parameterized operations over a [`VisionPage`]
//!
//! Every tool declares a typed `Params` struct; the registry deserializes raw
//! JSON into it so scenarios and the CLI share one entry point.

pub mod click;
pub mod fill;
pub mod markers;
pub mod navigate;
pub mod table;
pub mod utils;

pub use click::{ClickLabelParams, ClickLabelTool};
pub use fill::{FillFieldParams, FillFieldTool};
pub use markers::{ClearMarkersParams, ClearMarkersTool};
pub use navigate::{NavigateParams, NavigateTool};
pub use table::{ExtractTableParams, ExtractTableTool, RecognizeTableParams, RecognizeTableTool};

use crate::error::{FleroviumError, Result};
use crate::page::VisionPage;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// What a tool gets to work with
pub struct ToolContext<'a, 'p> {
    pub page: &'a mut VisionPage<'p>,
}

impl<'a, 'p> ToolContext<'a, 'p> {
    pub fn new(page: &'a mut VisionPage<'p>) -> Self {
        Self { page }
    }
}

/// Outcome of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn success_with(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// A single operation with typed parameters
pub trait Tool {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// JSON schema of `Params`
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or(Value::Null)
    }

    /// Deserialize raw parameters and run
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let typed = serde_json::from_value(params)
            .map_err(|e| FleroviumError::InvalidArgument(format!("Invalid parameters for {}: {}", Tool::name(self), e)))?;
        self.execute_typed(typed, context)
    }
}

/// Object-safe view of [`Tool`] used by the registry
pub trait DynTool {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn description(&self) -> &str {
        Tool::description(self)
    }

    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(ClickLabelTool);
        registry.register(FillFieldTool);
        registry.register(ExtractTableTool);
        registry.register(RecognizeTableTool);
        registry.register(ClearMarkersTool);
        registry
    }

    /// Add a tool, replacing any tool of the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = Tool::name(&tool).to_string();
        if self.tools.insert(name.clone(), Box::new(tool)).is_some() {
            log::debug!("Replaced tool {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool by name with raw JSON parameters
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self.get(name).ok_or_else(|| FleroviumError::ToolNotFound(name.to_string()))?;

        log::debug!("Executing tool {} with {}", name, params);
        tool.execute(params, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInference, FakePage};

    #[test]
    fn test_registry_defaults_in_order() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["navigate", "click_label", "fill_field", "extract_table", "recognize_table", "clear_markers"]
        );
        assert!(registry.get("fill_field").unwrap().parameters_schema().is_object());
    }

    #[test]
    fn test_unknown_tool() {
        let page = FakePage::new();
        let inference = FakeInference::default();
        let mut vision = VisionPage::new(&page, &inference);
        let mut context = ToolContext::new(&mut vision);

        let result = ToolRegistry::with_defaults().execute("hover", serde_json::json!({}), &mut context);
        assert!(matches!(result, Err(FleroviumError::ToolNotFound(name)) if name == "hover"));
    }

    #[test]
    fn test_bad_params_are_invalid_argument() {
        let page = FakePage::new();
        let inference = FakeInference::default();
        let mut vision = VisionPage::new(&page, &inference);
        let mut context = ToolContext::new(&mut vision);

        let result = ToolRegistry::with_defaults().execute("click_label", serde_json::json!({"label": 3}), &mut context);
        assert!(matches!(result, Err(FleroviumError::InvalidArgument(_))));
        assert!(inference.calls().is_empty());
    }

    #[test]
    fn test_tool_result_serialization() {
        let json = serde_json::to_value(ToolResult::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));

        let json = serde_json::to_value(ToolResult::success()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
