use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult, utils::resolve_url};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the navigate tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to open; relative paths resolve against the current page
    pub url: String,

    /// Wait until the document is complete (default: true)
    #[serde(default = "default_wait")]
    pub wait_for_load: bool,
}

fn default_wait() -> bool {
    true
}

/// Tool for opening a URL in the driven page
#[derive(Default)]
pub struct NavigateTool;

impl Tool for NavigateTool {
    type Params = NavigateParams;

    fn name(&self) -> &str {
        "navigate"
    }

    fn description(&self) -> &str {
        "Open a URL and optionally wait for the page to finish loading"
    }

    fn execute_typed(&self, params: NavigateParams, context: &mut ToolContext) -> Result<ToolResult> {
        let current = context.page.driver().current_url().ok();
        let url = resolve_url(&params.url, current.as_deref())?;

        context.page.navigate(&url, params.wait_for_load)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "original_url": params.url,
            "url": url,
            "waited": params.wait_for_load
        })))
    }
}
