//! The capture → infer → resolve → act pipeline
//!
//! A [`VisionPage`] drives one browser page. Each interaction takes a fresh
//! screenshot, asks the inference service about it, resolves a coordinate,
//! marks it, and then clicks or types there.

pub mod affordance;

pub use affordance::{Affordance, AffordanceKind};

use crate::browser::PageDriver;
use crate::dom::{CellTextNormalizer, ScriptTableLookup, TableData, TableNormalizer};
use crate::error::{FleroviumError, Result};
use crate::inference::InferenceService;
use crate::overlay::{DEFAULT_MARKER_COLOR, MarkerHandle, MarkerOverlay};
use crate::prediction::{LabelResolution, ResolvedTable, TargetCoordinate, resolve_form_field, resolve_label, resolve_table};
use crate::screenshot;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Tunables for the interaction pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Where screenshots are written
    pub screenshot_dir: PathBuf,

    /// Pause after each typed character
    pub type_delay: Duration,

    /// Pause after a click once the document is complete again
    pub settle_delay: Duration,

    pub marker_color: String,

    /// Also write a `-marked.png` copy of each screenshot showing the target
    pub annotate_screenshots: bool,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set screenshot directory
    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Builder method: set per-character typing delay
    pub fn type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    /// Builder method: set post-click settle delay
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Builder method: set marker color (any CSS color)
    pub fn marker_color(mut self, color: impl Into<String>) -> Self {
        self.marker_color = color.into();
        self
    }

    /// Builder method: enable annotated screenshot copies
    pub fn annotate_screenshots(mut self, annotate: bool) -> Self {
        self.annotate_screenshots = annotate;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("data"),
            type_delay: Duration::from_millis(100),
            settle_delay: Duration::from_millis(100),
            marker_color: DEFAULT_MARKER_COLOR.to_string(),
            annotate_screenshots: false,
        }
    }
}

/// What to do with an affordance
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Click,
    Fill(String),
    ExtractTable,
    RecognizeTable,
}

/// Result of [`VisionPage::perform`]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Clicked(LabelResolution),
    Filled(TargetCoordinate),
    Table(ResolvedTable),
    Recognized(TableData),
}

/// One page driven through visual predictions
pub struct VisionPage<'a> {
    driver: &'a dyn PageDriver,
    inference: &'a dyn InferenceService,
    normalizer: Box<dyn TableNormalizer>,
    overlay: MarkerOverlay,
    options: PipelineOptions,
}

impl<'a> VisionPage<'a> {
    pub fn new(driver: &'a dyn PageDriver, inference: &'a dyn InferenceService) -> Self {
        Self {
            driver,
            inference,
            normalizer: Box::new(CellTextNormalizer),
            overlay: MarkerOverlay::new(),
            options: PipelineOptions::default(),
        }
    }

    /// Builder method: set pipeline options
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method: replace the table normalizer
    pub fn with_normalizer(mut self, normalizer: Box<dyn TableNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn driver(&self) -> &dyn PageDriver {
        self.driver
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn overlay(&self) -> &MarkerOverlay {
        &self.overlay
    }

    /// Navigate and optionally wait until the document is complete
    pub fn navigate(&self, url: &str, wait_for_load: bool) -> Result<()> {
        log::info!("Navigating to {}", url);
        self.driver.navigate(url)?;

        if wait_for_load {
            self.driver.wait_for_ready()?;
        }

        Ok(())
    }

    pub fn take_screenshot(&self) -> Result<PathBuf> {
        screenshot::capture_to(self.driver, &self.options.screenshot_dir)
    }

    pub fn mark(&mut self, point: TargetCoordinate) -> Result<MarkerHandle> {
        self.overlay.mark(self.driver, point, &self.options.marker_color)
    }

    /// Remove every marker; never fails
    pub fn remove_marks(&mut self) -> usize {
        self.overlay.unmark_all(self.driver)
    }

    /// Click a pixel, then wait for the document to settle
    pub fn click_at(&self, point: TargetCoordinate) -> Result<()> {
        self.driver.click_at(point)?;
        self.driver.wait_for_ready()?;
        thread::sleep(self.options.settle_delay);
        Ok(())
    }

    /// Find a button or input by label and click it
    pub fn click(&mut self, affordance: &Affordance) -> Result<LabelResolution> {
        expect_kind(affordance, &[AffordanceKind::Button, AffordanceKind::Input], "click")?;

        let screenshot = self.take_screenshot()?;
        let bundle = self.inference.detect_and_classify(&screenshot, &affordance.model_id)?;
        let resolution = resolve_label(&bundle, &affordance.label)?;

        log::info!("{} resolved to {}", affordance, resolution.coordinate);
        self.annotate(&screenshot, resolution.coordinate);

        let point = resolution.coordinate;
        self.act_marked(point, |page| page.click_at(point))?;

        Ok(resolution)
    }

    /// Find an input by the role of its text, click it and type `keys`
    pub fn fill(&mut self, affordance: &Affordance, keys: &str) -> Result<TargetCoordinate> {
        expect_kind(affordance, &[AffordanceKind::Input], "fill")?;

        let screenshot = self.take_screenshot()?;
        let bundle = self.inference.detect_and_classify(&screenshot, &affordance.model_id)?;
        let scores = self.inference.classify_texts(&bundle.text_fragments())?;
        let point = resolve_form_field(&bundle, &scores, &affordance.label)?;

        log::info!("{} resolved to {}", affordance, point);
        self.annotate(&screenshot, point);

        self.act_marked(point, |page| {
            page.click_at(point)?;
            page.driver.type_text(keys, page.options.type_delay)
        })?;

        Ok(point)
    }

    /// Locate the most confident detected table in the DOM and read it.
    ///
    /// The table stays marked afterwards.
    pub fn extract_table(&mut self, affordance: &Affordance) -> Result<ResolvedTable> {
        expect_kind(affordance, &[AffordanceKind::Table], "extract")?;

        let screenshot = self.take_screenshot()?;
        let boxes = self.inference.detect_tables(&screenshot, &affordance.model_id)?;

        let lookup = ScriptTableLookup::new(self.driver);
        let resolved = resolve_table(&boxes, &lookup, self.normalizer.as_ref())?;

        log::info!(
            "{} resolved to {} at {} with {} row(s)",
            affordance,
            resolved.locator,
            resolved.coordinate,
            resolved.normalized_rows.len()
        );
        self.annotate(&screenshot, resolved.coordinate);

        if let Err(e) = self.mark(resolved.coordinate) {
            log::warn!("Failed to mark table at {}: {}", resolved.coordinate, e);
        }

        Ok(resolved)
    }

    /// Read a table from the screenshot pixels alone
    pub fn recognize_table(&mut self, affordance: &Affordance) -> Result<TableData> {
        expect_kind(affordance, &[AffordanceKind::Table], "recognize")?;

        let screenshot = self.take_screenshot()?;
        let table = self.inference.recognize_table(&screenshot)?;

        log::info!("{} recognized with {} row(s)", affordance, table.len());
        Ok(table)
    }

    /// Run an interaction against an affordance of a compatible kind
    pub fn perform(&mut self, affordance: &Affordance, interaction: Interaction) -> Result<Outcome> {
        match interaction {
            Interaction::Click => self.click(affordance).map(Outcome::Clicked),
            Interaction::Fill(keys) => self.fill(affordance, &keys).map(Outcome::Filled),
            Interaction::ExtractTable => self.extract_table(affordance).map(Outcome::Table),
            Interaction::RecognizeTable => self.recognize_table(affordance).map(Outcome::Recognized),
        }
    }

    /// Mark `point`, run `action`, then clear markers whatever the action returned.
    /// A marker that cannot be placed is logged and the action still runs.
    fn act_marked(&mut self, point: TargetCoordinate, action: impl FnOnce(&Self) -> Result<()>) -> Result<()> {
        if let Err(e) = self.mark(point) {
            log::warn!("Failed to mark {}: {}", point, e);
        }
        let outcome = action(self);
        self.remove_marks();
        outcome
    }

    fn annotate(&self, screenshot: &Path, point: TargetCoordinate) {
        if !self.options.annotate_screenshots {
            return;
        }

        match screenshot::annotate(screenshot, point) {
            Ok(path) => log::debug!("Annotated screenshot at {}", path.display()),
            Err(e) => log::warn!("Failed to annotate {}: {}", screenshot.display(), e),
        }
    }
}

fn expect_kind(affordance: &Affordance, allowed: &[AffordanceKind], action: &str) -> Result<()> {
    if allowed.contains(&affordance.kind) {
        Ok(())
    } else {
        Err(FleroviumError::InvalidArgument(format!("cannot {} {}", action, affordance)))
    }
}
