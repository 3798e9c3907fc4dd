//! Turning off Naver's CleanBot filter so hidden comments are listed too.

use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::app::{Result, ScrapeError};
use crate::config::selectors::CleanbotSelectors;
use crate::config::{LabelConfig, SelectorGroup};
use crate::scraper::driver::{Locator, PageDriver};
use crate::scraper::extractor::{extract_text, find_first};

/// What the toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanbotOutcome {
    /// The page has no CleanBot controls.
    NotPresent,
    /// The status message already says the filter is off.
    AlreadyDisabled,
    /// The dialog showed the filter unchecked; it was just confirmed.
    AlreadyOff,
    Disabled,
    /// Something went wrong; the dialog was closed if possible.
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Container,
    SettingButton,
    Modal,
    Checkbox,
    ConfirmButton,
    CloseButton,
}

impl Target {
    fn purpose(self) -> &'static str {
        match self {
            Target::Container => "CleanBot container",
            Target::SettingButton => "CleanBot settings button",
            Target::Modal => "CleanBot settings dialog",
            Target::Checkbox => "CleanBot checkbox",
            Target::ConfirmButton => "CleanBot confirm button",
            Target::CloseButton => "CleanBot close button",
        }
    }
}

pub struct CleanbotToggle<'a> {
    selectors: &'a CleanbotSelectors,
    labels: &'a LabelConfig,
    click_settle: Duration,
    toggle_settle: Duration,
}

impl<'a> CleanbotToggle<'a> {
    pub fn new(
        selectors: &'a CleanbotSelectors,
        labels: &'a LabelConfig,
        click_settle: Duration,
        toggle_settle: Duration,
    ) -> Self {
        Self {
            selectors,
            labels,
            click_settle,
            toggle_settle,
        }
    }

    /// Alternatives for each control, and whether it must be displayed to count.
    fn lookup(&self, target: Target) -> (&'a SelectorGroup, bool) {
        let s = self.selectors;
        match target {
            Target::Container => (&s.container, false),
            Target::SettingButton => (&s.setting_button, true),
            Target::Modal => (&s.modal, true),
            Target::Checkbox => (&s.checkbox, false),
            Target::ConfirmButton => (&s.confirm_button, true),
            Target::CloseButton => (&s.close_button, false),
        }
    }

    async fn locate<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        within: &Locator,
        target: Target,
    ) -> Option<Locator> {
        let (alternatives, require_visible) = self.lookup(target);
        let found = find_first(driver, within, alternatives, require_visible).await;
        if found.is_none() {
            debug!(purpose = target.purpose(), "Not found");
        }
        found
    }

    async fn require<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        within: &Locator,
        target: Target,
    ) -> Result<Locator> {
        self.locate(driver, within, target)
            .await
            .ok_or_else(|| ScrapeError::CommentSubsystem(format!("{} not found", target.purpose())))
    }

    async fn click<D: PageDriver + ?Sized>(&self, driver: &mut D, target: &Locator, purpose: &str) -> Result<()> {
        if driver.click(target).await? {
            Ok(())
        } else {
            Err(ScrapeError::CommentSubsystem(format!("{} disappeared before click", purpose)))
        }
    }

    /// Switch the filter off. Never fails; problems are logged and the
    /// dialog is dismissed so comment loading can go on.
    pub async fn disable<D: PageDriver + ?Sized>(&self, driver: &mut D) -> CleanbotOutcome {
        match self.try_disable(driver).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Failed to disable CleanBot");
                self.dismiss(driver).await;
                CleanbotOutcome::Failed
            }
        }
    }

    async fn try_disable<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<CleanbotOutcome> {
        let doc = Locator::document();

        let Some(container) = self.locate(driver, &doc, Target::Container).await else {
            return Ok(CleanbotOutcome::NotPresent);
        };

        let message = extract_text(driver, &container, &self.selectors.message).await;
        let disabled_label = self.labels.cleanbot_disabled.as_str();
        if !disabled_label.is_empty() && message.contains(disabled_label) {
            info!("CleanBot is already disabled");
            return Ok(CleanbotOutcome::AlreadyDisabled);
        }

        let button = self.require(driver, &container, Target::SettingButton).await?;
        self.click(driver, &button, Target::SettingButton.purpose()).await?;
        sleep(self.click_settle).await;

        let modal = self.require(driver, &doc, Target::Modal).await?;
        let checkbox = self.require(driver, &modal, Target::Checkbox).await?;

        if !is_checked(driver, &checkbox).await? {
            info!("CleanBot checkbox already unchecked");
            let confirm = self.require(driver, &modal, Target::ConfirmButton).await?;
            self.click(driver, &confirm, Target::ConfirmButton.purpose()).await?;
            sleep(self.toggle_settle).await;
            return Ok(CleanbotOutcome::AlreadyOff);
        }

        self.toggle(driver, &modal, &checkbox).await?;
        sleep(self.toggle_settle).await;

        let checkbox = self.require(driver, &modal, Target::Checkbox).await?;
        if is_checked(driver, &checkbox).await? {
            return Err(ScrapeError::CommentSubsystem(
                "CleanBot checkbox is still checked after toggling".to_string(),
            ));
        }

        let confirm = self.require(driver, &modal, Target::ConfirmButton).await?;
        self.click(driver, &confirm, Target::ConfirmButton.purpose()).await?;
        sleep(self.toggle_settle).await;

        info!("CleanBot disabled");
        Ok(CleanbotOutcome::Disabled)
    }

    /// Click the checkbox, falling back to its decoy and label elements.
    async fn toggle<D: PageDriver + ?Sized>(&self, driver: &mut D, modal: &Locator, checkbox: &Locator) -> Result<()> {
        match driver.click(checkbox).await {
            Ok(true) => return Ok(()),
            Ok(false) => debug!("Checkbox vanished, trying fallbacks"),
            Err(e) => debug!(error = %e, "Checkbox click failed, trying fallbacks"),
        }

        for selector in self.selectors.checkbox_fallback.iter() {
            match driver.click(&modal.first(selector)).await {
                Ok(true) => return Ok(()),
                Ok(false) => continue,
                Err(e) => debug!(selector, error = %e, "Fallback click failed"),
            }
        }

        Err(ScrapeError::CommentSubsystem(
            "Could not click the CleanBot checkbox".to_string(),
        ))
    }

    async fn dismiss<D: PageDriver + ?Sized>(&self, driver: &mut D) {
        let doc = Locator::document();
        if let Some(close) = self.locate(driver, &doc, Target::CloseButton).await {
            match driver.click(&close).await {
                Ok(_) => debug!("Closed CleanBot dialog"),
                Err(e) => debug!(error = %e, "Failed to close CleanBot dialog"),
            }
        }
    }
}

async fn is_checked<D: PageDriver + ?Sized>(driver: &mut D, checkbox: &Locator) -> Result<bool> {
    let class = driver.attribute(checkbox, "class").await?.unwrap_or_default();
    Ok(class.split_whitespace().any(|c| c == "is_checked"))
}
