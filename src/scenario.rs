//! Scripted sequences of tool calls
//!
//! A scenario file is JSON:
//!
//! ```json
//! {
//!   "name": "codecademy login",
//!   "steps": [
//!     {"tool": "navigate", "params": {"url": "https://www.codecademy.com"}},
//!     {"tool": "click_label", "params": {"label": "login", "model": "auth-detection"}}
//!   ]
//! }
//! ```
//!
//! A bare JSON array of steps is accepted too.

use crate::error::{FleroviumError, Result};
use crate::tools::{ToolContext, ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub tool: String,

    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(Default::default())
}

impl Step {
    pub fn new(tool: impl Into<String>, params: Value) -> Self {
        Self { tool: tool.into(), params }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    pub steps: Vec<Step>,

    /// Keep going after a failed step instead of aborting
    #[serde(default)]
    pub continue_on_error: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Full(Scenario),
    Steps(Vec<Step>),
}

/// Result of one executed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub tool: String,
    pub result: ToolResult,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), steps: Vec::new(), continue_on_error: false }
    }

    /// Builder method: append a step
    pub fn step(mut self, tool: impl Into<String>, params: Value) -> Self {
        self.push(Step::new(tool, params));
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ScenarioFile = serde_json::from_str(json)
            .map_err(|e| FleroviumError::InvalidArgument(format!("Invalid scenario: {}", e)))?;

        Ok(match file {
            ScenarioFile::Full(scenario) => scenario,
            ScenarioFile::Steps(steps) => Self { name: String::new(), steps, continue_on_error: false },
        })
    }

    /// Read a scenario file; an unnamed scenario takes the file stem as its name
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut scenario = Self::from_json(&json)?;

        if scenario.name.is_empty() {
            scenario.name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        }

        Ok(scenario)
    }

    /// Run every step in order.
    ///
    /// The first failing step ends the run with its error unless
    /// `continue_on_error` is set, in which case the failure is recorded as
    /// an unsuccessful [`ToolResult`] and the run goes on.
    pub fn run(&self, registry: &ToolRegistry, context: &mut ToolContext) -> Result<Vec<StepOutcome>> {
        log::info!("Running scenario '{}' ({} step(s))", self.name, self.steps.len());
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            log::info!("Step {}/{}: {}", i + 1, self.steps.len(), step.tool);

            let result = match registry.execute(&step.tool, step.params.clone(), context) {
                Ok(result) => result,
                Err(e) if self.continue_on_error => {
                    log::warn!("Step {} ({}) failed: {}", i + 1, step.tool, e);
                    ToolResult::failure(e.to_string())
                }
                Err(e) => {
                    return Err(FleroviumError::ToolExecutionFailed {
                        tool: step.tool.clone(),
                        reason: format!("step {}: {}", i + 1, e),
                    });
                }
            };

            outcomes.push(StepOutcome { tool: step.tool.clone(), result });
        }

        Ok(outcomes)
    }
}
