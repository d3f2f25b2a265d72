use crate::error::Result;
use crate::prediction::TargetCoordinate;
use serde_json::Value;
use std::time::Duration;

/// The browser primitives the pipeline needs.
///
/// [`BrowserSession`](crate::browser::BrowserSession) implements this over a
/// Chrome tab. Every method blocks until the browser has answered.
pub trait PageDriver {
    /// Start navigating the active tab to `url`
    fn navigate(&self, url: &str) -> Result<()>;

    /// Block until navigation finished and the document reports `complete`
    fn wait_for_ready(&self) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    /// Mouse click at a viewport pixel
    fn click_at(&self, point: TargetCoordinate) -> Result<()>;

    /// Type into the focused element, pausing `delay` after each character
    fn type_text(&self, text: &str, delay: Duration) -> Result<()>;

    /// Evaluate a script in the page and return its value, if any
    fn evaluate(&self, script: &str) -> Result<Option<Value>>;

    /// PNG bytes of the current viewport
    fn capture_screenshot(&self) -> Result<Vec<u8>>;
}
