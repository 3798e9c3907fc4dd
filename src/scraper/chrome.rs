use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration, Instant};
use tracing::{debug, info, warn};

use crate::app::{Result, ScrapeError};
use crate::scraper::config::BrowserSettings;
use crate::scraper::driver::{Locator, PageDriver};
use crate::scraper::script::{DomScript, BODY_READY};

const BODY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result shape shared by every [`DomScript`].
#[derive(Debug, Deserialize)]
struct Probe<T> {
    found: bool,
    value: Option<T>,
}

/// A single Chrome tab driven over the DevTools protocol.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    settings: BrowserSettings,
    closed: bool,
}

impl ChromeSession {
    /// Launch a browser with the given settings and open one blank tab.
    pub async fn open(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.window_width, settings.window_height)
            .request_timeout(settings.page_load_timeout());

        for arg in &settings.chrome_args {
            builder = builder.arg(arg.as_str());
        }

        if let Some(ref executable) = settings.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScrapeError::SessionCreation(format!("Failed to build browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ScrapeError::SessionCreation(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = match Self::prepare_page(&browser, settings).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(e);
            }
        };

        info!(headless = settings.headless, "Browser session started");

        Ok(Self {
            browser,
            page,
            handler,
            settings: settings.clone(),
            closed: false,
        })
    }

    async fn prepare_page(browser: &Browser, settings: &BrowserSettings) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::SessionCreation(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = settings.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| ScrapeError::SessionCreation(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(page)
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let limit = self.settings.script_timeout();
        let result = timeout(limit, self.page.evaluate(script))
            .await
            .map_err(|_| ScrapeError::Driver(format!("Script timed out after {}s", limit.as_secs())))?
            .map_err(|e| ScrapeError::Driver(format!("Script execution failed: {}", e)))?;

        result
            .into_value()
            .map_err(|e| ScrapeError::Driver(format!("Failed to parse result: {:?}", e)))
    }

    async fn probe<T: DeserializeOwned>(&self, script: String) -> Result<Probe<T>> {
        self.eval(script).await
    }

    async fn wait_for_body(&self, url: &str, deadline: Instant) -> Result<()> {
        loop {
            match self.eval::<bool>(BODY_READY.to_string()).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!(url, error = %e, "Body check failed"),
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: self.settings.page_load_timeout_secs,
                });
            }
            sleep(BODY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageDriver for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let limit = self.settings.page_load_timeout();
        let deadline = Instant::now() + limit;
        let timed_out = || ScrapeError::NavigationTimeout {
            url: url.to_string(),
            timeout_secs: limit.as_secs(),
        };

        match timeout(limit, self.page.goto(url)).await {
            Err(_) | Ok(Err(CdpError::Timeout)) => return Err(timed_out()),
            Ok(Err(e)) => {
                return Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Ok(Ok(_)) => {}
        }

        self.wait_for_body(url, deadline).await
    }

    async fn count(&mut self, within: &Locator, selector: &str) -> Result<usize> {
        let probe: Probe<usize> = self.probe(DomScript::count(within, selector)).await?;
        Ok(probe.value.unwrap_or(0))
    }

    async fn text(&mut self, target: &Locator) -> Result<Option<String>> {
        let probe: Probe<String> = self.probe(DomScript::text(target)).await?;
        Ok(probe.found.then(|| probe.value.unwrap_or_default()))
    }

    async fn attribute(&mut self, target: &Locator, name: &str) -> Result<Option<String>> {
        let probe: Probe<String> = self.probe(DomScript::attribute(target, name)).await?;
        Ok(probe.value.filter(|_| probe.found))
    }

    async fn visible(&mut self, target: &Locator) -> Result<Option<bool>> {
        let probe: Probe<bool> = self.probe(DomScript::visible(target)).await?;
        Ok(probe.found.then(|| probe.value.unwrap_or(false)))
    }

    async fn click(&mut self, target: &Locator) -> Result<bool> {
        let probe: Probe<bool> = self.probe(DomScript::click(target)).await?;
        Ok(probe.found)
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScrapeError::Driver(format!("Failed to close browser: {}", e)));
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "Browser process did not exit cleanly");
        }
        self.handler.abort();
        result
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Browser session dropped without being closed");
            self.handler.abort();
        }
    }
}
