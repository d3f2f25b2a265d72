//! # flerovium
//!
//! Selector-free browser automation. Instead of CSS selectors, UI elements are
//! found from the predictions of visual models run on a screenshot of the page.
//!
//! ## How it works
//!
//! Every interaction runs the same pipeline:
//!
//! 1. capture a screenshot of the viewport
//! 2. send it to an inference service (object detection plus classification)
//! 3. resolve the requested label to one pixel coordinate
//! 4. mark the coordinate on the page, act on it, clear the marker
//!
//! Tables take a different last step: the detected region is mapped back
//! into the DOM and the table's markup is normalized into rows.
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use flerovium::{Affordance, BrowserSession, InferenceClient, InferenceConfig, LaunchOptions, VisionPage};
//!
//! # fn main() -> flerovium::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let inference = InferenceClient::new(InferenceConfig::default())?;
//! let mut page = VisionPage::new(&session, &inference);
//!
//! page.navigate("https://www.codecademy.com", true)?;
//! page.click(&Affordance::button("login", "auth-detection"))?;
//! page.fill(&Affordance::input("username", "form-segmentation"), "me@example.com")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust,no_run
//! use flerovium::{BrowserSession, InferenceClient, InferenceConfig, LaunchOptions, VisionPage};
//! use flerovium::tools::{ToolContext, ToolRegistry};
//! use serde_json::json;
//!
//! # fn main() -> flerovium::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let inference = InferenceClient::new(InferenceConfig::default())?;
//! let mut page = VisionPage::new(&session, &inference);
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(&mut page);
//!
//! registry.execute("navigate", json!({"url": "w3schools.com/html/html_tables.asp"}), &mut context)?;
//! let table = registry.execute("extract_table", json!({"model": "tables/3"}), &mut context)?;
//! println!("{}", serde_json::to_string_pretty(&table.data).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`prediction`]: prediction payloads and the label, form-field and table resolvers
//! - [`inference`]: HTTP client for the inference service
//! - [`browser`]: browser session management and the [`PageDriver`] primitives
//! - [`dom`]: table lookup by coordinate and table normalization
//! - [`overlay`]: debug markers drawn over the page
//! - [`screenshot`]: capture and annotation of screenshots
//! - [`page`]: the [`VisionPage`] pipeline
//! - [`tools`] / [`scenario`]: JSON-driven tools and scripted runs
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod inference;
pub mod overlay;
pub mod page;
pub mod prediction;
pub mod scenario;
pub mod screenshot;
pub mod tools;

#[cfg(test)]
mod testing;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, PageDriver};
pub use dom::{CellTextNormalizer, DomTableMatch, TableData, TableNormalizer};
pub use error::{FleroviumError, Result};
pub use inference::{InferenceClient, InferenceConfig, InferenceService};
pub use overlay::{MarkerHandle, MarkerOverlay};
pub use page::{Affordance, AffordanceKind, Interaction, Outcome, PipelineOptions, VisionPage};
pub use prediction::{
    LabelResolution, PredictionBundle, ResolvedTable, TableBox, TableLocator, TargetCoordinate, TextRoleScore,
};
pub use scenario::{Scenario, Step, StepOutcome};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
