//! Debug markers drawn over the page at resolved coordinates
//!
//! Markers are cosmetic. Placing one can fail like any script evaluation, but
//! removing them never returns an error: failures are logged and ignored.

use crate::browser::PageDriver;
use crate::error::{FleroviumError, Result};
use crate::prediction::TargetCoordinate;
use serde_json::Value;
use std::fmt;

pub const DEFAULT_MARKER_COLOR: &str = "rgba(255, 0, 0, 0.5)";

/// Width and height of a marker in CSS pixels
pub const MARKER_SIZE_PX: u32 = 30;

const MARKER_ATTRIBUTE: &str = "data-flerovium-marker";
const MARKER_Z_INDEX: u32 = 9999;

/// Token for one placed marker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// Places and removes markers on one page
#[derive(Debug, Default)]
pub struct MarkerOverlay {
    next_id: u64,
    live: Vec<MarkerHandle>,
}

impl MarkerOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a circular marker with its top-left corner at `point`
    pub fn mark(&mut self, page: &dyn PageDriver, point: TargetCoordinate, color: &str) -> Result<MarkerHandle> {
        if !point.is_finite() {
            return Err(FleroviumError::InvalidCoordinate(format!("cannot mark {}", point)));
        }

        self.next_id += 1;
        let handle = MarkerHandle(self.next_id);

        page.evaluate(&mark_script(&handle, point, color))?;
        log::debug!("Placed {} at {}", handle, point);

        self.live.push(handle.clone());
        Ok(handle)
    }

    /// Remove one marker. Returns how many elements were removed.
    pub fn unmark(&mut self, page: &dyn PageDriver, handle: &MarkerHandle) -> usize {
        self.live.retain(|live| live != handle);
        remove_matching(page, &format!("[{}=\"{}\"]", MARKER_ATTRIBUTE, handle.0))
    }

    /// Remove every marker on the page, including ones placed by other overlays
    pub fn unmark_all(&mut self, page: &dyn PageDriver) -> usize {
        self.live.clear();
        remove_matching(page, &format!("[{}]", MARKER_ATTRIBUTE))
    }

    /// Markers placed by this overlay and not yet removed
    pub fn live(&self) -> &[MarkerHandle] {
        &self.live
    }
}

fn mark_script(handle: &MarkerHandle, point: TargetCoordinate, color: &str) -> String {
    format!(
        r#"
        (function() {{
            const marker = document.createElement('div');
            marker.setAttribute('{attribute}', '{id}');
            marker.style.position = 'absolute';
            marker.style.left = '{x}px';
            marker.style.top = '{y}px';
            marker.style.width = '{size}px';
            marker.style.height = '{size}px';
            marker.style.borderRadius = '50%';
            marker.style.backgroundColor = {color};
            marker.style.zIndex = '{z_index}';
            marker.style.pointerEvents = 'none';
            document.body.appendChild(marker);
            return true;
        }})()
        "#,
        attribute = MARKER_ATTRIBUTE,
        id = handle.0,
        x = point.x,
        y = point.y,
        size = MARKER_SIZE_PX,
        color = Value::from(color),
        z_index = MARKER_Z_INDEX,
    )
}

fn remove_matching(page: &dyn PageDriver, selector: &str) -> usize {
    let script = format!(
        r#"
        (function() {{
            const markers = document.querySelectorAll({selector});
            markers.forEach(marker => marker.remove());
            return markers.length;
        }})()
        "#,
        selector = Value::from(selector),
    );

    match page.evaluate(&script) {
        Ok(value) => {
            let removed = value.and_then(|v| v.as_u64()).unwrap_or(0) as usize;
            log::debug!("Removed {} marker(s) matching {}", removed, selector);
            removed
        }
        Err(e) => {
            log::warn!("Failed to remove markers: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    #[test]
    fn test_mark_then_unmark_all_leaves_none() {
        for existing in 0..4 {
            let page = FakePage::new();
            page.set_markers(existing);
            let mut overlay = MarkerOverlay::new();

            overlay.mark(&page, TargetCoordinate::new(10.0, 20.0), DEFAULT_MARKER_COLOR).unwrap();
            assert_eq!(page.markers(), existing + 1);

            assert_eq!(overlay.unmark_all(&page), existing + 1);
            assert_eq!(page.markers(), 0);
            assert!(overlay.live().is_empty());
        }
    }

    #[test]
    fn test_unmark_all_is_idempotent() {
        let page = FakePage::new();
        let mut overlay = MarkerOverlay::new();

        assert_eq!(overlay.unmark_all(&page), 0);

        overlay.mark(&page, TargetCoordinate::new(1.0, 1.0), DEFAULT_MARKER_COLOR).unwrap();
        overlay.unmark_all(&page);
        assert_eq!(page.markers(), 0);
        overlay.unmark_all(&page);
        assert_eq!(page.markers(), 0);
    }

    #[test]
    fn test_unmark_single_handle() {
        let page = FakePage::new();
        let mut overlay = MarkerOverlay::new();

        let first = overlay.mark(&page, TargetCoordinate::new(1.0, 1.0), DEFAULT_MARKER_COLOR).unwrap();
        let second = overlay.mark(&page, TargetCoordinate::new(2.0, 2.0), "blue").unwrap();
        assert_ne!(first, second);

        assert_eq!(overlay.unmark(&page, &first), 1);
        assert_eq!(overlay.live(), &[second]);
        assert_eq!(page.markers(), 1);

        let scripts = page.scripts();
        assert!(scripts.last().unwrap().contains(r#"[data-flerovium-marker=\"1\"]"#));
    }

    #[test]
    fn test_removal_failure_is_swallowed() {
        let page = FakePage::new();
        let mut overlay = MarkerOverlay::new();
        overlay.mark(&page, TargetCoordinate::new(1.0, 1.0), DEFAULT_MARKER_COLOR).unwrap();

        page.fail_scripts(true);
        assert_eq!(overlay.unmark_all(&page), 0);
        assert!(overlay.live().is_empty());
    }

    #[test]
    fn test_mark_failure_propagates() {
        let page = FakePage::new();
        page.fail_scripts(true);
        let mut overlay = MarkerOverlay::new();

        let result = overlay.mark(&page, TargetCoordinate::new(1.0, 1.0), DEFAULT_MARKER_COLOR);
        assert!(matches!(result, Err(FleroviumError::EvaluationFailed(_))));
        assert!(overlay.live().is_empty());
    }

    #[test]
    fn test_mark_script_shape() {
        let script = mark_script(&MarkerHandle(7), TargetCoordinate::new(12.5, 40.0), "rgba(0, 0, 255, 0.5)");

        assert!(script.contains("marker.style.left = '12.5px'"));
        assert!(script.contains("marker.style.top = '40px'"));
        assert!(script.contains("marker.style.width = '30px'"));
        assert!(script.contains("marker.style.zIndex = '9999'"));
        assert!(script.contains(r#"marker.style.backgroundColor = "rgba(0, 0, 255, 0.5)""#));
        assert!(script.contains("'data-flerovium-marker', '7'"));
    }

    #[test]
    fn test_mark_rejects_nan() {
        let page = FakePage::new();
        let mut overlay = MarkerOverlay::new();
        let result = overlay.mark(&page, TargetCoordinate::new(f64::NAN, 0.0), DEFAULT_MARKER_COLOR);
        assert!(matches!(result, Err(FleroviumError::InvalidCoordinate(_))));
    }
}
