use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};

use crate::app::{AppContext, Result};
use crate::output::{run_suffix, write_failed_urls, write_results, WrittenFiles};
use crate::scraper::{ChromeSession, PageDriver, RunReport, Runner};
use crate::source::load_urls;

/// How a scrape command ended.
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// The URL file held nothing to scrape.
    NoUrls,
    /// A shutdown request stopped the run; nothing was written.
    Interrupted(RunReport),
    Completed {
        report: RunReport,
        files: WrittenFiles,
    },
}

impl ScrapeOutcome {
    /// 0 when every URL succeeded, 130 when interrupted, 1 otherwise.
    pub fn status(&self) -> u8 {
        match self {
            ScrapeOutcome::NoUrls => 1,
            ScrapeOutcome::Interrupted(_) => 130,
            ScrapeOutcome::Completed { report, .. } if report.is_success() => 0,
            ScrapeOutcome::Completed { .. } => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

/// Scrape every URL in `urls_path` with a fresh browser session and write the results.
pub async fn scrape(ctx: &AppContext, urls_path: &Path) -> Result<ScrapeOutcome> {
    let urls = load_urls(urls_path)?;
    if urls.is_empty() {
        error!(path = %urls_path.display(), "No valid URLs to scrape");
        return Ok(ScrapeOutcome::NoUrls);
    }

    let session = ChromeSession::open(&ctx.config.browser).await?;
    scrape_with(ctx, session, &urls, &run_suffix(urls_path)).await
}

/// Run `urls` on `driver` and write the results named after `suffix`.
pub async fn scrape_with<D: PageDriver>(
    ctx: &AppContext,
    driver: D,
    urls: &[String],
    suffix: &str,
) -> Result<ScrapeOutcome> {
    let report = Runner::new(&ctx.config)
        .with_cancel_flag(ctx.shutdown.clone())
        .run(driver, urls)
        .await;

    if report.interrupted {
        warn!(
            articles = report.articles.len(),
            "Run interrupted, results were not written"
        );
        return Ok(ScrapeOutcome::Interrupted(report));
    }

    let files = write_results(
        &report.articles,
        &report.comments,
        &ctx.config.output,
        &ctx.output_dir,
        suffix,
    )?;

    if !report.failed_urls.is_empty() {
        warn!(count = report.failed_urls.len(), "Some URLs failed");
        for url in &report.failed_urls {
            warn!(url = %url, "Failed");
        }
        write_failed_urls(&report.failed_urls, &ctx.output_dir);
    }

    report.log_summary();
    if let Some(path) = &files.articles {
        info!(path = %path.display(), "Articles saved");
    }
    if let Some(path) = &files.comments {
        info!(path = %path.display(), "Comments saved");
    }

    Ok(ScrapeOutcome::Completed { report, files })
}
