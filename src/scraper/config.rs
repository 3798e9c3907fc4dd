use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Run pacing and retry policy (`[scraping]`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapingSettings {
    /// Seconds to wait before each request after the first (default: 3.0)
    pub delay_between_requests: f64,

    /// Extra passes over URLs that failed (default: 1)
    pub retry_count: u32,

    /// Accepted for compatibility; pages are always processed one at a time (default: 1)
    pub max_workers: u32,
}

impl Default for ScrapingSettings {
    fn default() -> Self {
        Self {
            delay_between_requests: 3.0,
            retry_count: 1,
            max_workers: 1,
        }
    }
}

impl ScrapingSettings {
    /// Delay between requests in the main pass
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_between_requests.max(0.0))
    }

    /// Delay between requests in retry pass `attempt` (1-based): doubles each pass
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.delay() * 2u32.saturating_pow(attempt.min(16))
    }
}

/// Browser session options (`[browser]`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// How long to wait for an element that should appear after an interaction, in seconds (default: 10)
    pub implicit_wait_secs: u64,

    /// Page load timeout in seconds (default: 30)
    pub page_load_timeout_secs: u64,

    /// Timeout for each in-page script in seconds (default: 30)
    pub script_timeout_secs: u64,

    /// Browser window width in pixels (default: 1920)
    pub window_width: u32,

    /// Browser window height in pixels (default: 1080)
    pub window_height: u32,

    /// Pause after clicks that load content, in milliseconds (default: 3000)
    pub click_settle_ms: u64,

    /// Pause after toggling a setting in a dialog, in milliseconds (default: 1000)
    pub toggle_settle_ms: u64,

    /// Extra command-line arguments passed to Chrome
    pub chrome_args: Vec<String>,

    /// Chrome/Chromium executable; found automatically when unset
    pub chrome_executable: Option<PathBuf>,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            implicit_wait_secs: 10,
            page_load_timeout_secs: 30,
            script_timeout_secs: 30,
            window_width: 1920,
            window_height: 1080,
            click_settle_ms: 3000,
            toggle_settle_ms: 1000,
            chrome_args: vec![
                "--no-sandbox".to_string(),
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-software-rasterizer".to_string(),
                "--lang=ko-KR".to_string(),
            ],
            chrome_executable: None,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl BrowserSettings {
    /// Get the page load timeout as a Duration
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    /// Get the script timeout as a Duration
    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }

    /// Get the element wait as a Duration
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    /// Get the post-click pause as a Duration
    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    /// Get the post-toggle pause as a Duration
    pub fn toggle_settle(&self) -> Duration {
        Duration::from_millis(self.toggle_settle_ms)
    }

    /// Settings with every pause set to zero, for driving fake pages in tests
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            implicit_wait_secs: 0,
            click_settle_ms: 0,
            toggle_settle_ms: 0,
            ..Default::default()
        }
    }
}
