use crate::{browser::{config::{ConnectionOptions, LaunchOptions},
                      driver::PageDriver},
            error::{FleroviumError, Result},
            prediction::TargetCoordinate};
use headless_chrome::{Browser, Tab, browser::tab::point::Point,
                      protocol::cdp::Page::CaptureScreenshotFormatOption};
use serde_json::Value;
use std::{ffi::OsStr, sync::Arc, thread, time::{Duration, Instant}};

/// How long to wait for `document.readyState` to become `complete`
const READY_TIMEOUT: Duration = Duration::from_secs(30);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive between slow inference round trips
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| FleroviumError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| FleroviumError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        log::info!(
            "Launched browser ({}, {}x{})",
            if options.headless { "headless" } else { "headed" },
            options.window_width,
            options.window_height
        );

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url.clone(), Duration::from_millis(options.timeout))
            .map_err(|e| FleroviumError::ConnectionFailed(e.to_string()))?;

        log::info!("Connected to browser at {}", options.ws_url);
        Ok(Self { browser })
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| FleroviumError::NotInitialized(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the tab the pipeline drives: the focused visible tab, else the first visible one, else the first
    pub fn tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        for check in ["document.visibilityState === 'visible' && document.hasFocus()", "document.visibilityState === 'visible'"] {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => {
                        log::debug!("Failed to check tab status: {}", e);
                        continue;
                    }
                }
            }
        }

        tabs.into_iter().next().ok_or_else(|| FleroviumError::NotInitialized("No open tab".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Scroll the viewport down by one window height
    pub fn scroll_down(&self) -> Result<()> {
        self.tab()?
            .evaluate("window.scrollBy(0, window.innerHeight)", false)
            .map_err(|e| FleroviumError::EvaluationFailed(format!("Failed to scroll: {}", e)))?;

        Ok(())
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        // The browser process exits when `Browser` is dropped; closing tabs ends the session early
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false);
        }
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| FleroviumError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    fn wait_for_ready(&self) -> Result<()> {
        let tab = self.tab()?;

        tab.wait_until_navigated()
            .map_err(|e| FleroviumError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        let started = Instant::now();
        loop {
            let complete = tab
                .evaluate("document.readyState === 'complete'", false)
                .map_err(|e| FleroviumError::EvaluationFailed(e.to_string()))?
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            if complete {
                return Ok(());
            }

            if started.elapsed() > READY_TIMEOUT {
                return Err(FleroviumError::NavigationFailed(format!(
                    "Document not complete after {}s",
                    READY_TIMEOUT.as_secs()
                )));
            }

            thread::sleep(READY_POLL_INTERVAL);
        }
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab()?.get_url())
    }

    fn click_at(&self, point: TargetCoordinate) -> Result<()> {
        if !point.is_finite() {
            return Err(FleroviumError::InvalidCoordinate(format!("cannot click {}", point)));
        }

        self.tab()?
            .click_point(Point { x: point.x, y: point.y })
            .map_err(|e| FleroviumError::InteractionFailed(format!("Click at {} failed: {}", point, e)))?;

        Ok(())
    }

    fn type_text(&self, text: &str, delay: Duration) -> Result<()> {
        let tab = self.tab()?;
        let mut buffer = [0u8; 4];

        for ch in text.chars() {
            tab.type_str(ch.encode_utf8(&mut buffer))
                .map_err(|e| FleroviumError::InteractionFailed(format!("Typing failed: {}", e)))?;
            thread::sleep(delay);
        }

        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        let result = self
            .tab()?
            .evaluate(script, false)
            .map_err(|e| FleroviumError::EvaluationFailed(e.to_string()))?;

        Ok(result.value)
    }

    fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.tab()?
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| FleroviumError::ScreenshotFailed(e.to_string()))
    }
}
