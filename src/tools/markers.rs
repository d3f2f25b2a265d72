use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The clear_markers tool takes no parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClearMarkersParams {}

/// Tool for removing every debug marker from the page
#[derive(Default)]
pub struct ClearMarkersTool;

impl Tool for ClearMarkersTool {
    type Params = ClearMarkersParams;

    fn name(&self) -> &str {
        "clear_markers"
    }

    fn description(&self) -> &str {
        "Remove all debug markers from the page"
    }

    fn execute_typed(&self, _params: ClearMarkersParams, context: &mut ToolContext) -> Result<ToolResult> {
        let removed = context.page.remove_marks();
        Ok(ToolResult::success_with(serde_json::json!({ "removed": removed })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::VisionPage;
    use crate::prediction::TargetCoordinate;
    use crate::testing::{FakeInference, FakePage};

    #[test]
    fn test_clear_markers_removes_all() {
        let page = FakePage::new();
        page.set_markers(2);
        let inference = FakeInference::default();
        let mut vision = VisionPage::new(&page, &inference);
        vision.mark(TargetCoordinate::new(10.0, 10.0)).unwrap();
        let mut context = ToolContext::new(&mut vision);

        let result = ClearMarkersTool.execute(serde_json::json!({}), &mut context).unwrap();

        assert_eq!(result.data.unwrap()["removed"], 3);
        assert_eq!(page.markers(), 0);
        assert!(vision.overlay().live().is_empty());
    }

    #[test]
    fn test_clear_markers_survives_page_failure() {
        let page = FakePage::new();
        page.fail_scripts(true);
        let inference = FakeInference::default();
        let mut vision = VisionPage::new(&page, &inference);
        let mut context = ToolContext::new(&mut vision);

        let result = ClearMarkersTool.execute(serde_json::json!({}), &mut context).unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()["removed"], 0);
    }
}
