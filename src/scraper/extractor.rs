//! Selector-group lookups shared by every scraping stage.

use std::sync::LazyLock;

use regex::Regex;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::app::{Result, ScrapeError};
use crate::config::SelectorGroup;
use crate::scraper::driver::{Locator, PageDriver};

const PRESENCE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A digit run, allowing thousands separators ("1,234").
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d{3})*").expect("number pattern is valid"));

/// Outcome of reading one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Empty,
}

impl FieldValue {
    fn from_text(text: String) -> Self {
        if text.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Present(text)
        }
    }

    /// The value, or `FieldMissing` for a field the record cannot do without.
    pub fn require(self, field: &'static str, url: &str) -> Result<String> {
        match self {
            FieldValue::Present(text) => Ok(text),
            FieldValue::Empty => Err(ScrapeError::FieldMissing {
                field,
                url: url.to_string(),
            }),
        }
    }

    pub fn or_empty(self) -> String {
        match self {
            FieldValue::Present(text) => text,
            FieldValue::Empty => String::new(),
        }
    }
}

/// Trimmed text of the first selector in `group` that matches below `within`.
///
/// A selector that matches wins even when its text is empty; later
/// alternatives are only consulted when nothing matched. Lookup errors are
/// treated like a miss.
pub async fn extract_text<D>(driver: &mut D, within: &Locator, group: &SelectorGroup) -> String
where
    D: PageDriver + ?Sized,
{
    for selector in group.iter() {
        match driver.text(&within.first(selector)).await {
            Ok(Some(text)) => return text.trim().to_string(),
            Ok(None) => continue,
            Err(e) => {
                debug!(selector, error = %e, "Selector lookup failed");
                continue;
            }
        }
    }
    String::new()
}

pub async fn extract_field<D>(driver: &mut D, within: &Locator, group: &SelectorGroup) -> FieldValue
where
    D: PageDriver + ?Sized,
{
    FieldValue::from_text(extract_text(driver, within, group).await)
}

/// First integer in `text` with separators removed; empty when there is none.
pub fn extract_number(text: &str) -> String {
    NUMBER_RE
        .find(text)
        .map(|m| m.as_str().replace(',', ""))
        .unwrap_or_default()
}

/// First selector in `alternatives` with a match below `within`.
///
/// With `require_visible`, matches that exist but aren't displayed are skipped.
pub async fn find_first<D>(
    driver: &mut D,
    within: &Locator,
    alternatives: &SelectorGroup,
    require_visible: bool,
) -> Option<Locator>
where
    D: PageDriver + ?Sized,
{
    for selector in alternatives.iter() {
        let candidate = within.first(selector);
        match driver.visible(&candidate).await {
            Ok(Some(visible)) if visible || !require_visible => return Some(candidate),
            Ok(_) => continue,
            Err(e) => {
                debug!(selector, error = %e, "Selector lookup failed");
                continue;
            }
        }
    }
    None
}

/// All elements matched by one selector of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMatch {
    pub selector: String,
    pub count: usize,
}

impl ListMatch {
    pub fn item(&self, within: &Locator, index: usize) -> Locator {
        within.nth(&self.selector, index)
    }
}

/// The first selector in `group` matching at least one element below `within`.
///
/// Returns an error only when no selector matched and at least one lookup failed.
pub async fn find_all<D>(
    driver: &mut D,
    within: &Locator,
    group: &SelectorGroup,
) -> Result<Option<ListMatch>>
where
    D: PageDriver + ?Sized,
{
    let mut last_error = None;
    for selector in group.iter() {
        match driver.count(within, selector).await {
            Ok(0) => continue,
            Ok(count) => {
                return Ok(Some(ListMatch {
                    selector: selector.to_string(),
                    count,
                }))
            }
            Err(e) => {
                debug!(selector, error = %e, "Selector count failed");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Poll until some selector in `group` matches below `within`, up to `limit`.
pub async fn wait_for_presence<D>(
    driver: &mut D,
    within: &Locator,
    group: &SelectorGroup,
    limit: Duration,
) -> bool
where
    D: PageDriver + ?Sized,
{
    let deadline = Instant::now() + limit;
    loop {
        if let Ok(Some(_)) = find_all(driver, within, group).await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(PRESENCE_POLL_INTERVAL).await;
    }
}
