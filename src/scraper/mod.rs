//! Browser-driven scraping of Naver News articles and their comments.
//!
//! # Architecture
//!
//! ```text
//! URL list → Runner → ArticlePipeline → (article, comments) → RunState
//!                          │
//!                          ├── extractor: selector groups → field text
//!                          ├── cleanbot:  switch off the comment filter
//!                          └── comments:  "load more" loop + per-node reads
//! ```
//!
//! Everything talks to the page through [`PageDriver`]; [`ChromeSession`]
//! is the real implementation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use naver_news_scraper::config::Config;
//! use naver_news_scraper::scraper::{ChromeSession, Runner};
//!
//! let config = Config::load(None)?;
//! let session = ChromeSession::open(&config.browser).await?;
//! let report = Runner::new(&config).run(session, &urls).await;
//! ```

mod chrome;
mod cleanbot;
mod comments;
mod config;
mod driver;
mod extractor;
mod pipeline;
mod runner;
mod script;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
pub(crate) mod test_pages;

pub use chrome::ChromeSession;
pub use cleanbot::{CleanbotOutcome, CleanbotToggle};
pub use comments::CommentLoader;
pub use config::{BrowserSettings, ScrapingSettings};
pub use driver::{Locator, PageDriver, Step};
pub use extractor::{
    extract_field, extract_number, extract_text, find_all, find_first, wait_for_presence, FieldValue, ListMatch,
};
pub use pipeline::{ArticlePipeline, ScrapedArticle, Stage};
pub use runner::{RunReport, Runner};
