use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::time::{sleep, Duration, Instant};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{ArticleRecord, CommentRecord, RunState};
use crate::scraper::driver::PageDriver;
use crate::scraper::pipeline::ArticlePipeline;

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub articles: Vec<ArticleRecord>,
    pub comments: Vec<CommentRecord>,
    /// URLs still failing after every retry pass.
    pub failed_urls: Vec<String>,
    /// Distinct URLs the run was given.
    pub attempted: usize,
    pub retry_passes: u32,
    pub duration: Duration,
    /// The run stopped early on a shutdown request.
    pub interrupted: bool,
}

impl RunReport {
    /// Percentage of URLs that produced an article.
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.articles.len() as f64 / self.attempted as f64 * 100.0
    }

    pub fn average_comments(&self) -> f64 {
        if self.articles.is_empty() {
            return 0.0;
        }
        self.comments.len() as f64 / self.articles.len() as f64
    }

    pub fn is_success(&self) -> bool {
        self.failed_urls.is_empty() && !self.interrupted
    }

    pub fn log_summary(&self) {
        info!(
            attempted = self.attempted,
            articles = self.articles.len(),
            comments = self.comments.len(),
            failed = self.failed_urls.len(),
            retry_passes = self.retry_passes,
            elapsed_secs = self.duration.as_secs_f64(),
            "Run finished: success rate {:.1}%, {:.1} comments per article",
            self.success_rate(),
            self.average_comments()
        );
    }
}

/// Sleeps between requests, never before the first one of a run.
#[derive(Default)]
struct Pacer {
    started: bool,
}

impl Pacer {
    async fn wait(&mut self, delay: Duration) {
        if self.started && !delay.is_zero() {
            sleep(delay).await;
        }
        self.started = true;
    }
}

enum PassOutcome {
    Completed,
    Interrupted,
}

/// Processes a URL list one page at a time over a single browser session.
pub struct Runner<'a> {
    config: &'a Config,
    cancel: Arc<AtomicBool>,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that stops the run when set.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run every URL, then retry failures, then close the driver.
    ///
    /// The driver is closed exactly once, whatever happened during the run.
    pub async fn run<D: PageDriver>(&self, mut driver: D, urls: &[String]) -> RunReport {
        let started = Instant::now();
        let scraping = &self.config.scraping;
        let mut state = RunState::new();
        let mut pacer = Pacer::default();

        if scraping.max_workers > 1 {
            warn!(max_workers = scraping.max_workers, "Parallel scraping is not supported, using one worker");
        }
        info!(urls = urls.len(), delay_secs = scraping.delay_between_requests, "Starting scrape");

        let mut outcome = self
            .run_pass(&mut driver, urls, scraping.delay(), &mut state, &mut pacer, false)
            .await;

        let mut retry_passes = 0;
        while matches!(outcome, PassOutcome::Completed)
            && retry_passes < scraping.retry_count
            && !state.failed_urls.is_empty()
        {
            retry_passes += 1;
            let retry = state.take_failures();
            let delay = scraping.retry_delay(retry_passes);
            info!(
                attempt = retry_passes,
                of = scraping.retry_count,
                urls = retry.len(),
                delay_secs = delay.as_secs_f64(),
                "Retrying failed URLs"
            );
            outcome = self
                .run_pass(&mut driver, &retry, delay, &mut state, &mut pacer, true)
                .await;
        }

        match driver.close().await {
            Ok(()) => info!("Browser session closed"),
            Err(e) => warn!(error = %e, "Failed to close browser session"),
        }

        RunReport {
            articles: state.articles,
            comments: state.comments,
            failed_urls: state.failed_urls,
            attempted: urls.len(),
            retry_passes,
            duration: started.elapsed(),
            interrupted: matches!(outcome, PassOutcome::Interrupted),
        }
    }

    async fn run_pass<D: PageDriver>(
        &self,
        driver: &mut D,
        urls: &[String],
        delay: Duration,
        state: &mut RunState,
        pacer: &mut Pacer,
        retrying: bool,
    ) -> PassOutcome {
        let pipeline = ArticlePipeline::new(self.config, &self.cancel);
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(remaining = total - index, "Shutdown requested, stopping");
                if retrying {
                    // Unvisited retries are still failures
                    for url in &urls[index..] {
                        state.record_failure(url);
                    }
                }
                return PassOutcome::Interrupted;
            }

            pacer.wait(delay).await;
            info!("[{}/{}] {}", index + 1, total, url);

            match AssertUnwindSafe(pipeline.process(driver, url)).catch_unwind().await {
                Ok(Ok(scraped)) => {
                    let comments = scraped.comments.len();
                    let article_id = state.commit(scraped.article, scraped.comments);
                    info!(article_id, comments, "Article stored");
                }
                Ok(Err(e)) => {
                    warn!(url = %url, error = %e, transient = e.is_transient(), "Article failed");
                    state.record_failure(url);
                }
                Err(_) => {
                    error!(url = %url, "Article processing panicked");
                    state.record_failure(url);
                }
            }
        }

        PassOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::config::BrowserSettings;
    use crate::scraper::fake::{FakeDriver, FakePage};
    use crate::scraper::test_pages;

    fn urls(n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| format!("https://n.news.naver.com/mnews/article/001/000000000{}", i))
            .collect()
    }

    fn config(delay: f64, retry_count: u32) -> Config {
        let mut config = Config::default();
        config.browser = BrowserSettings::instant();
        config.scraping.delay_between_requests = delay;
        config.scraping.retry_count = retry_count;
        config
    }

    fn driver_for(urls: &[String]) -> FakeDriver {
        urls.iter().fold(FakeDriver::new(), |driver, url| {
            driver.with_page(url, FakePage::single(&test_pages::article("0", false)))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_sequential() {
        let urls = urls(3);
        let config = config(0.0, 0);
        let driver = driver_for(&urls).with_page(&urls[1], test_pages::article_with_comments());

        let report = Runner::new(&config).run(driver, &urls).await;

        let ids: Vec<u64> = report.articles.iter().map(|a| a.article_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let comment_ids: Vec<u64> = report.comments.iter().map(|c| c.comment_id).collect();
        assert_eq!(comment_ids, vec![1, 2, 3]);
        assert!(report.comments.iter().all(|c| c.article_id == 2));
        assert!(report.is_success());
        assert_eq!(report.success_rate(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_requests_not_after_last() {
        let urls = urls(3);
        let config = config(2.0, 0);
        let driver = driver_for(&urls);
        let log = driver.log();

        let report = Runner::new(&config).run(driver, &urls).await;

        let log = log.lock().unwrap();
        let times: Vec<Instant> = log.visits.iter().map(|(_, t)| *t).collect();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_secs(2));
        assert_eq!(times[2] - times[1], Duration::from_secs(2));
        assert_eq!(report.duration, Duration::from_secs(4));
        assert_eq!(log.closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_visits_only_failed_urls() {
        let urls = urls(3);
        let config = config(1.0, 1);
        let driver = driver_for(&urls).fail_navigation(&urls[1], 1);
        let log = driver.log();

        let report = Runner::new(&config).run(driver, &urls).await;

        let log = log.lock().unwrap();
        assert_eq!(
            log.visited(),
            vec![urls[0].as_str(), urls[1].as_str(), urls[2].as_str(), urls[1].as_str()]
        );
        // Retry pass waits twice the base delay
        assert_eq!(log.visits[3].1 - log.visits[2].1, Duration::from_secs(2));
        assert!(report.failed_urls.is_empty());
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.articles[2].url, urls[1]);
        assert_eq!(report.retry_passes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_failure_is_reported() {
        let urls = urls(2);
        let config = config(0.0, 2);
        let driver = driver_for(&urls).fail_navigation(&urls[0], 10);
        let log = driver.log();

        let report = Runner::new(&config).run(driver, &urls).await;

        assert_eq!(report.failed_urls, vec![urls[0].clone()]);
        assert_eq!(report.articles.len() + report.failed_urls.len(), report.attempted);
        assert_eq!(report.retry_passes, 2);
        assert_eq!(log.lock().unwrap().visits.len(), 4);
        assert!(!report.is_success());
        assert_eq!(report.success_rate(), 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_stops_and_closes() {
        let urls = urls(3);
        let config = config(0.0, 1);
        let driver = driver_for(&urls);
        let log = driver.log();
        let cancel = Arc::new(AtomicBool::new(true));

        let report = Runner::new(&config)
            .with_cancel_flag(cancel)
            .run(driver, &urls)
            .await;

        assert!(report.interrupted);
        assert!(report.articles.is_empty());
        assert_eq!(report.retry_passes, 0);
        let log = log.lock().unwrap();
        assert!(log.visits.is_empty());
        assert_eq!(log.closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_run_still_closes_driver() {
        let config = config(1.0, 1);
        let driver = FakeDriver::new();
        let log = driver.log();

        let report = Runner::new(&config).run(driver, &[]).await;

        assert_eq!(report.attempted, 0);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(log.lock().unwrap().closes, 1);
    }
}
