use crate::error::Result;
use crate::page::Affordance;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the extract_table tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractTableParams {
    /// Table detection model id
    pub model: String,

    /// Name used in logs (default: "table")
    #[serde(default = "default_label")]
    pub label: String,
}

/// Parameters for the recognize_table tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecognizeTableParams {
    /// Name used in logs (default: "table")
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_label() -> String {
    "table".to_string()
}

/// Model id reported for the image-only recognizer, which takes no model parameter
const RECOGNIZER_MODEL: &str = "tatr";

/// Tool for reading the most confident detected table out of the DOM
#[derive(Default)]
pub struct ExtractTableTool;

impl Tool for ExtractTableTool {
    type Params = ExtractTableParams;

    fn name(&self) -> &str {
        "extract_table"
    }

    fn description(&self) -> &str {
        "Detect tables on screen, locate the most confident one in the DOM and return its rows"
    }

    fn execute_typed(&self, params: ExtractTableParams, context: &mut ToolContext) -> Result<ToolResult> {
        let affordance = Affordance::table(params.label, params.model);
        let table = context.page.extract_table(&affordance)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "locator": table.locator.to_string(),
            "unique": table.locator.is_unique(),
            "x": table.coordinate.x,
            "y": table.coordinate.y,
            "confidence": table.confidence,
            "headers": table.normalized_rows.headers,
            "rows": table.normalized_rows.rows
        })))
    }
}

/// Tool for reading a table from screenshot pixels only
#[derive(Default)]
pub struct RecognizeTableTool;

impl Tool for RecognizeTableTool {
    type Params = RecognizeTableParams;

    fn name(&self) -> &str {
        "recognize_table"
    }

    fn description(&self) -> &str {
        "Recognize table structure from a screenshot without consulting the DOM"
    }

    fn execute_typed(&self, params: RecognizeTableParams, context: &mut ToolContext) -> Result<ToolResult> {
        let affordance = Affordance::table(params.label, RECOGNIZER_MODEL);
        let table = context.page.recognize_table(&affordance)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "headers": table.headers,
            "rows": table.rows
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomTableMatch, TableData};
    use crate::page::{PipelineOptions, VisionPage};
    use crate::prediction::TableBox;
    use crate::testing::{FakeInference, FakePage};

    #[test]
    fn test_params_default_label() {
        let params: ExtractTableParams = serde_json::from_value(serde_json::json!({"model": "tables/3"})).unwrap();
        assert_eq!(params.label, "table");

        let params: RecognizeTableParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.label, "table");
    }

    #[test]
    fn test_extract_table_returns_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let page = FakePage::new();
        page.set_table(Some(
            DomTableMatch::new(
                "<table id=\"customers\"><tr><th>Company</th><th>Country</th></tr>\
                 <tr><td>Ernst Handel</td><td>Austria</td></tr></table>",
            )
            .with_id("customers")
            .with_row(&["Company", "Country"])
            .with_row(&["Ernst Handel", "Austria"]),
        ));
        let inference = FakeInference { tables: vec![TableBox::new(120.0, 300.0, 0.8)], ..Default::default() };
        let mut vision = VisionPage::new(&page, &inference).with_options(PipelineOptions::new().screenshot_dir(tmp.path()));
        let mut context = ToolContext::new(&mut vision);

        let result = ExtractTableTool.execute(serde_json::json!({"model": "tables/3"}), &mut context).unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["locator"], "#customers");
        assert_eq!(data["unique"], true);
        assert_eq!(data["rows"][0]["Country"], "Austria");
        assert_eq!(inference.calls(), vec!["detect_tables tables/3"]);
    }

    #[test]
    fn test_recognize_table_returns_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let page = FakePage::new();
        let inference = FakeInference {
            recognized: Some(TableData::from_grid(vec![
                vec!["Zone".to_string(), "Count".to_string()],
                vec!["A".to_string(), "3".to_string()],
            ])),
            ..Default::default()
        };
        let mut vision = VisionPage::new(&page, &inference).with_options(PipelineOptions::new().screenshot_dir(tmp.path()));
        let mut context = ToolContext::new(&mut vision);

        let result = RecognizeTableTool.execute(serde_json::json!({}), &mut context).unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["headers"], serde_json::json!(["Zone", "Count"]));
        assert_eq!(data["rows"][0]["Count"], "3");
        assert_eq!(page.markers(), 0);
    }
}
