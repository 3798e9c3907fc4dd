//! In-memory [`PageDriver`] over static HTML, for tests.
//!
//! Each page is a chain of HTML states. Clicking an element that matches the
//! selector registered for the current state moves the page to the next one,
//! which is enough to model "open comments", "load more" and dialogs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tokio::time::Instant;

use crate::app::{Result, ScrapeError};
use crate::scraper::driver::{Locator, PageDriver};

#[derive(Debug, Clone)]
struct Transition {
    from: usize,
    selector: String,
    to: usize,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    states: Vec<String>,
    transitions: Vec<Transition>,
}

impl FakePage {
    pub fn single(html: &str) -> Self {
        Self {
            states: vec![html.to_string()],
            transitions: Vec::new(),
        }
    }

    /// Clicking `selector` in the latest state shows `html`.
    pub fn on_click(mut self, selector: &str, html: &str) -> Self {
        let from = self.states.len() - 1;
        self.states.push(html.to_string());
        self.transitions.push(Transition {
            from,
            selector: selector.to_string(),
            to: from + 1,
        });
        self
    }
}

/// What a [`FakeDriver`] was asked to do.
#[derive(Debug, Default)]
pub struct DriverLog {
    pub visits: Vec<(String, Instant)>,
    pub clicks: Vec<String>,
    pub closes: usize,
}

impl DriverLog {
    pub fn visited(&self) -> Vec<&str> {
        self.visits.iter().map(|(url, _)| url.as_str()).collect()
    }
}

#[derive(Default)]
pub struct FakeDriver {
    pages: HashMap<String, FakePage>,
    nav_failures: HashMap<String, usize>,
    failing_selectors: Vec<String>,
    current: Option<(String, usize)>,
    log: Arc<Mutex<DriverLog>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Time out the next `times` navigations to `url`.
    pub fn fail_navigation(mut self, url: &str, times: usize) -> Self {
        self.nav_failures.insert(url.to_string(), times);
        self
    }

    /// Fail every lookup whose locator or selector mentions `selector`.
    pub fn fail_lookups(mut self, selector: &str) -> Self {
        self.failing_selectors.push(selector.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<DriverLog>> {
        self.log.clone()
    }

    fn check_failure(&self, locator: &Locator, extra: Option<&str>) -> Result<()> {
        let mentioned = locator
            .steps()
            .iter()
            .map(|s| s.selector.as_str())
            .chain(extra)
            .any(|s| self.failing_selectors.iter().any(|f| s.contains(f.as_str())));
        if mentioned {
            return Err(ScrapeError::Driver(format!("injected failure at {}", locator)));
        }
        Ok(())
    }

    fn document(&self) -> Result<Html> {
        let (url, state) = self
            .current
            .as_ref()
            .ok_or_else(|| ScrapeError::Driver("no page loaded".to_string()))?;
        let page = &self.pages[url];
        Ok(Html::parse_document(&page.states[*state]))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Driver(format!("invalid selector '{}': {:?}", selector, e)))
}

fn resolve<'a>(html: &'a Html, locator: &Locator) -> Result<Option<ElementRef<'a>>> {
    let mut node: Option<ElementRef<'a>> = None;
    for step in locator.steps() {
        let selector = parse_selector(&step.selector)?;
        let next = match node {
            None => html.select(&selector).nth(step.index),
            Some(el) => el.select(&selector).nth(step.index),
        };
        match next {
            Some(el) => node = Some(el),
            None => return Ok(None),
        }
    }
    Ok(Some(node.unwrap_or_else(|| html.root_element())))
}

fn is_hidden(el: &ElementRef) -> bool {
    let style: String = el
        .value()
        .attr("style")
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    el.value().attr("hidden").is_some() || style.contains("display:none") || style.contains("visibility:hidden")
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .visits
            .push((url.to_string(), Instant::now()));

        if let Some(remaining) = self.nav_failures.get_mut(url).filter(|n| **n > 0) {
            *remaining -= 1;
            self.current = None;
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: 30,
            });
        }

        if !self.pages.contains_key(url) {
            self.current = None;
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }

        self.current = Some((url.to_string(), 0));
        Ok(())
    }

    async fn count(&mut self, within: &Locator, selector: &str) -> Result<usize> {
        self.check_failure(within, Some(selector))?;
        let html = self.document()?;
        let selector = parse_selector(selector)?;
        if within.is_document() {
            return Ok(html.select(&selector).count());
        }
        Ok(resolve(&html, within)?.map_or(0, |el| el.select(&selector).count()))
    }

    async fn text(&mut self, target: &Locator) -> Result<Option<String>> {
        self.check_failure(target, None)?;
        let html = self.document()?;
        Ok(resolve(&html, target)?.map(|el| el.text().collect::<String>()))
    }

    async fn attribute(&mut self, target: &Locator, name: &str) -> Result<Option<String>> {
        self.check_failure(target, None)?;
        let html = self.document()?;
        Ok(resolve(&html, target)?.and_then(|el| el.value().attr(name).map(String::from)))
    }

    async fn visible(&mut self, target: &Locator) -> Result<Option<bool>> {
        self.check_failure(target, None)?;
        let html = self.document()?;
        Ok(resolve(&html, target)?.map(|el| {
            let hidden = is_hidden(&el) || el.ancestors().filter_map(ElementRef::wrap).any(|a| is_hidden(&a));
            !hidden
        }))
    }

    async fn click(&mut self, target: &Locator) -> Result<bool> {
        self.check_failure(target, None)?;
        let next = {
            let html = self.document()?;
            let Some(el) = resolve(&html, target)? else {
                return Ok(false);
            };
            let Some((url, state)) = self.current.as_ref() else {
                return Ok(false);
            };
            let page = &self.pages[url];
            let mut next = None;
            for transition in page.transitions.iter().filter(|t| t.from == *state) {
                if parse_selector(&transition.selector)?.matches(&el) {
                    next = Some(transition.to);
                    break;
                }
            }
            next
        };

        let label = target.steps().last().map(|s| s.selector.clone()).unwrap_or_default();
        self.log.lock().unwrap().clicks.push(label);

        if let (Some(to), Some((_, state))) = (next, self.current.as_mut()) {
            *state = to;
        }
        Ok(true)
    }

    async fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().closes += 1;
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_click_advances_page_state() {
        let page = FakePage::single(r#"<button class="open">open</button>"#)
            .on_click(".open", r#"<div class="panel">shown</div>"#);
        let mut driver = FakeDriver::new().with_page("https://a", page);
        driver.navigate("https://a").await.unwrap();

        let doc = Locator::document();
        assert_eq!(driver.count(&doc, ".panel").await.unwrap(), 0);
        assert!(driver.click(&doc.first(".open")).await.unwrap());
        assert_eq!(driver.count(&doc, ".panel").await.unwrap(), 1);
        assert!(!driver.click(&doc.first(".open")).await.unwrap());
    }

    #[tokio::test]
    async fn test_navigation_failures_are_consumed() {
        let mut driver = FakeDriver::new()
            .with_page("https://a", FakePage::single("<p>ok</p>"))
            .fail_navigation("https://a", 1);

        let err = assert_err!(driver.navigate("https://a").await);
        assert!(matches!(err, ScrapeError::NavigationTimeout { .. }));
        assert_ok!(driver.navigate("https://a").await);
        assert_eq!(driver.log().lock().unwrap().visits.len(), 2);
    }

    #[tokio::test]
    async fn test_hidden_ancestor_hides_element() {
        let page = FakePage::single(r#"<div style="display: none"><a class="x">x</a></div><a class="y">y</a>"#);
        let mut driver = FakeDriver::new().with_page("https://a", page);
        driver.navigate("https://a").await.unwrap();

        let doc = Locator::document();
        assert_eq!(driver.visible(&doc.first(".x")).await.unwrap(), Some(false));
        assert_eq!(driver.visible(&doc.first(".y")).await.unwrap(), Some(true));
        assert_eq!(driver.visible(&doc.first(".z")).await.unwrap(), None);
    }
}
