//! In-memory stand-ins for the browser and the inference service, used by unit tests

use crate::browser::PageDriver;
use crate::dom::{DomTableMatch, TableData};
use crate::error::{FleroviumError, Result};
use crate::inference::InferenceService;
use crate::prediction::{PredictionBundle, TableBox, TargetCoordinate, TextRoleScore};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::Duration;

/// Records what the pipeline does to a page and simulates markers and tables
pub(crate) struct FakePage {
    url: RefCell<String>,
    markers: Cell<usize>,
    table: RefCell<Option<DomTableMatch>>,
    fail_scripts: Cell<bool>,
    scripts: RefCell<Vec<String>>,
    events: RefCell<Vec<String>>,
    typed: RefCell<Vec<(String, Duration)>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            url: RefCell::new("https://www.example.com/login".to_string()),
            markers: Cell::new(0),
            table: RefCell::new(None),
            fail_scripts: Cell::new(false),
            scripts: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            typed: RefCell::new(Vec::new()),
        }
    }

    pub fn set_markers(&self, count: usize) {
        self.markers.set(count);
    }

    pub fn markers(&self) -> usize {
        self.markers.get()
    }

    pub fn set_table(&self, table: Option<DomTableMatch>) {
        *self.table.borrow_mut() = table;
    }

    pub fn fail_scripts(&self, fail: bool) {
        self.fail_scripts.set(fail);
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }

    /// "navigate", "ready", "mark", "unmark", "click x,y" and "type" in call order
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn typed(&self) -> Vec<(String, Duration)> {
        self.typed.borrow().clone()
    }
}

impl PageDriver for FakePage {
    fn navigate(&self, url: &str) -> Result<()> {
        *self.url.borrow_mut() = url.to_string();
        self.events.borrow_mut().push("navigate".to_string());
        Ok(())
    }

    fn wait_for_ready(&self) -> Result<()> {
        self.events.borrow_mut().push("ready".to_string());
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.url.borrow().clone())
    }

    fn click_at(&self, point: TargetCoordinate) -> Result<()> {
        self.events.borrow_mut().push(format!("click {},{}", point.x, point.y));
        Ok(())
    }

    fn type_text(&self, text: &str, delay: Duration) -> Result<()> {
        self.typed.borrow_mut().push((text.to_string(), delay));
        self.events.borrow_mut().push("type".to_string());
        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        self.scripts.borrow_mut().push(script.to_string());

        if self.fail_scripts.get() {
            return Err(FleroviumError::EvaluationFailed("page crashed".to_string()));
        }

        if script.contains("elementFromPoint") {
            let found = serde_json::to_string(&*self.table.borrow()).unwrap_or_default();
            return Ok(Some(Value::String(found)));
        }

        if script.contains("appendChild") {
            self.markers.set(self.markers.get() + 1);
            self.events.borrow_mut().push("mark".to_string());
            return Ok(Some(Value::Bool(true)));
        }

        if script.contains("querySelectorAll") {
            let present = self.markers.get();
            let removed = if script.contains("marker=") { present.min(1) } else { present };
            self.markers.set(present - removed);
            self.events.borrow_mut().push("unmark".to_string());
            return Ok(Some(Value::from(removed as u64)));
        }

        Ok(None)
    }

    fn capture_screenshot(&self) -> Result<Vec<u8>> {
        let image = image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| FleroviumError::ScreenshotFailed(e.to_string()))?;
        Ok(png)
    }
}

/// Canned inference answers; records which operations were called
#[derive(Default)]
pub(crate) struct FakeInference {
    pub bundle: Option<PredictionBundle>,
    pub tables: Vec<TableBox>,
    pub scores: Vec<TextRoleScore>,
    pub recognized: Option<TableData>,
    /// Make `classify_texts` answer with a network failure
    pub fail_classification: bool,
    pub calls: RefCell<Vec<String>>,
    pub fragments: RefCell<Vec<String>>,
}

impl FakeInference {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn fragments(&self) -> Vec<String> {
        self.fragments.borrow().clone()
    }
}

impl InferenceService for FakeInference {
    fn detect_and_classify(&self, image: &Path, workflow_id: &str) -> Result<PredictionBundle> {
        assert!(image.exists(), "screenshot {} was not written", image.display());
        self.calls.borrow_mut().push(format!("detect_and_classify {}", workflow_id));
        self.bundle.clone().ok_or(FleroviumError::NoPredictions)
    }

    fn detect_tables(&self, image: &Path, model_id: &str) -> Result<Vec<TableBox>> {
        assert!(image.exists(), "screenshot {} was not written", image.display());
        self.calls.borrow_mut().push(format!("detect_tables {}", model_id));
        Ok(self.tables.clone())
    }

    fn classify_texts(&self, fragments: &[String]) -> Result<Vec<TextRoleScore>> {
        self.calls.borrow_mut().push("classify_texts".to_string());
        *self.fragments.borrow_mut() = fragments.to_vec();
        if self.fail_classification {
            return Err(FleroviumError::NetworkFailure("text classifier unavailable".to_string()));
        }
        Ok(self.scores.clone())
    }

    fn recognize_table(&self, image: &Path) -> Result<TableData> {
        assert!(image.exists(), "screenshot {} was not written", image.display());
        self.calls.borrow_mut().push("recognize_table".to_string());
        self.recognized.clone().ok_or(FleroviumError::NoPredictions)
    }
}
