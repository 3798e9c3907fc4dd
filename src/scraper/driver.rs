use std::fmt;

use async_trait::async_trait;

use crate::app::Result;

/// One hop in a [`Locator`]: the `index`-th match of `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub selector: String,
    pub index: usize,
}

/// Address of an element as a path of selector matches from the document.
///
/// Locators are resolved again on every driver call instead of holding a
/// handle to a live node, so pages that re-render between calls (comment
/// lists growing after "load more") never leave a stale reference behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    steps: Vec<Step>,
}

impl Locator {
    /// The document itself.
    pub fn document() -> Self {
        Self::default()
    }

    /// The `index`-th element matching `selector` below this one.
    pub fn nth(&self, selector: &str, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step {
            selector: selector.to_string(),
            index,
        });
        Self { steps }
    }

    /// The first element matching `selector` below this one.
    pub fn first(&self, selector: &str) -> Self {
        self.nth(selector, 0)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_document(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document")?;
        for step in &self.steps {
            write!(f, " > {}[{}]", step.selector, step.index)?;
        }
        Ok(())
    }
}

/// The operations the scraper needs from a loaded page.
///
/// Lookups report absence as `None`/`false`; `Err` is reserved for the
/// browser itself failing (script errors, timeouts, closed sessions).
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url` and wait until the document has a body.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Number of elements matching `selector` below `within`.
    async fn count(&mut self, within: &Locator, selector: &str) -> Result<usize>;

    /// Raw text content of `target` (rendered text as a fallback).
    async fn text(&mut self, target: &Locator) -> Result<Option<String>>;

    /// Attribute `name` of `target`; `None` if the element or attribute is missing.
    async fn attribute(&mut self, target: &Locator, name: &str) -> Result<Option<String>>;

    /// Whether `target` is displayed; `None` if it doesn't exist.
    async fn visible(&mut self, target: &Locator) -> Result<Option<bool>>;

    /// Click `target`; `false` if it doesn't exist.
    async fn click(&mut self, target: &Locator) -> Result<bool>;

    /// Release the browser. Only the first call has an effect.
    async fn close(&mut self) -> Result<()>;
}
