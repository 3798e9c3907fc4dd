//! # naver-news-scraper
//!
//! Scrapes Naver News articles and their full comment threads with a real
//! browser, and writes them out as CSV, JSON or Excel tables.
//!
//! ## Architecture
//!
//! The scraper follows a sequential pipeline:
//!
//! ```text
//! URL file → Runner → ArticlePipeline → RunState → Output
//! ```
//!
//! - [`source`]: Reads and validates the URL list
//! - [`scraper`]: Browser session, field extraction, comment loading
//! - [`output`]: Table files and the failed-URL report
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape every URL in urls.txt into ./output
//! naver-news-scraper --urls urls.txt
//!
//! # Use a custom config and output directory
//! naver-news-scraper --urls urls.txt --config scraper.toml --output results/
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context, errors, logging and signals
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration loading, selectors and labels
//! - [`domain`]: Article and comment records, run state

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct holds the loaded configuration,
/// the output directory and the shutdown flag.
pub mod app;

/// Command-line interface using clap.
///
/// A single command: `--urls <file> [--config <file>] [--output <dir>]`.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/naver-news-scraper/config.toml` by default, supporting:
/// - Pacing and retries
/// - Browser options
/// - Selector groups and UI labels
pub mod config;

/// Core domain models.
///
/// - [`ArticleRecord`](domain::ArticleRecord): One scraped article
/// - [`CommentRecord`](domain::CommentRecord): One comment, live or deleted
/// - [`RunState`](domain::RunState): Accumulated results and id counters
pub mod domain;

/// Result files.
///
/// Writes article and comment tables, and the list of URLs that still failed.
pub mod output;

/// Browser scraping.
///
/// Uses Chrome via chromiumoxide, driven through the
/// [`PageDriver`](scraper::PageDriver) trait.
///
/// - [`ChromeSession`](scraper::ChromeSession): Chrome-backed driver
/// - [`Runner`](scraper::Runner): Sequential run with pacing and retries
/// - [`ArticlePipeline`](scraper::ArticlePipeline): Per-article state machine
pub mod scraper;

/// URL list input.
pub mod source;
