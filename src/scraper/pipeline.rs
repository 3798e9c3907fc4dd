use std::fmt;
use std::sync::atomic::AtomicBool;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::app::{Result, ScrapeError};
use crate::config::labels::{AgeBracket, CountLabel};
use crate::config::{Config, LabelConfig, SelectorConfig};
use crate::domain::{ArticleRecord, CommentCounts, CommentRecord, Demographics};
use crate::scraper::cleanbot::CleanbotToggle;
use crate::scraper::comments::CommentLoader;
use crate::scraper::config::BrowserSettings;
use crate::scraper::driver::{Locator, PageDriver};
use crate::scraper::extractor::{extract_field, extract_number, extract_text, find_all, find_first, wait_for_presence};

/// Where an article is in its processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    ArticleExtracted,
    CommentsPending,
    CommentsLoaded,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::ArticleExtracted => "article-extracted",
            Stage::CommentsPending => "comments-pending",
            Stage::CommentsLoaded => "comments-loaded",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// One successfully processed article, not yet committed to the run.
#[derive(Debug, Clone)]
pub struct ScrapedArticle {
    pub article: ArticleRecord,
    pub comments: Vec<CommentRecord>,
    /// Stages passed through, in order.
    pub stages: Vec<Stage>,
}

/// Drives one article URL from page load to extracted comments.
pub struct ArticlePipeline<'a> {
    selectors: &'a SelectorConfig,
    labels: &'a LabelConfig,
    browser: &'a BrowserSettings,
    cancel: &'a AtomicBool,
}

impl<'a> ArticlePipeline<'a> {
    pub fn new(config: &'a Config, cancel: &'a AtomicBool) -> Self {
        Self {
            selectors: &config.selectors,
            labels: &config.labels,
            browser: &config.browser,
            cancel,
        }
    }

    /// Process `url`.
    ///
    /// Errors mean the article is unusable (navigation failed, no title).
    /// Problems in the comment section only cost the comment data.
    pub async fn process<D: PageDriver + ?Sized>(&self, driver: &mut D, url: &str) -> Result<ScrapedArticle> {
        let mut stages = vec![Stage::Loading];
        debug!(url, stage = %Stage::Loading, "Loading article");
        driver.navigate(url).await?;

        let mut article = self.extract_article(driver, url).await?;
        stages.push(Stage::ArticleExtracted);
        info!(title = %article.title, comment_count = %article.comment_count, "Article extracted");

        if article.has_no_comments() {
            info!("Article has no comments");
            stages.push(Stage::Done);
            return Ok(ScrapedArticle {
                article,
                comments: Vec::new(),
                stages,
            });
        }

        stages.push(Stage::CommentsPending);
        self.collect_comment_stats(driver, &mut article).await;

        let comments = match self.collect_comments(driver).await {
            Ok(Some(comments)) => {
                stages.push(Stage::CommentsLoaded);
                comments
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(url, error = %e, "Keeping article without comments");
                Vec::new()
            }
        };

        stages.push(Stage::Done);
        Ok(ScrapedArticle {
            article,
            comments,
            stages,
        })
    }

    async fn extract_article<D: PageDriver + ?Sized>(&self, driver: &mut D, url: &str) -> Result<ArticleRecord> {
        let doc = Locator::document();
        let s = &self.selectors.article;

        let mut article = ArticleRecord::new(url);
        article.title = extract_field(driver, &doc, &s.title).await.require("title", url)?;
        article.content = extract_field(driver, &doc, &s.content).await.or_empty();
        article.author = extract_field(driver, &doc, &s.author).await.or_empty();
        article.publish_date = extract_field(driver, &doc, &s.publish_date).await.or_empty();
        article.category = extract_field(driver, &doc, &s.category).await.or_empty();
        article.like_count = extract_number(&extract_text(driver, &doc, &s.like_count).await);
        article.comment_count = extract_number(&extract_text(driver, &doc, &s.comment_count).await);
        Ok(article)
    }

    /// Fill in the count rows and the demographic chart. Each part is
    /// independent; a part that fails leaves its fields empty.
    async fn collect_comment_stats<D: PageDriver + ?Sized>(&self, driver: &mut D, article: &mut ArticleRecord) {
        match self.read_comment_counts(driver).await {
            Ok(counts) => article.apply_counts(counts),
            Err(e) => warn!(error = %e, "Failed to read comment counts"),
        }

        match self.read_demographics(driver).await {
            Ok(Some(demographics)) => article.apply_demographics(demographics),
            Ok(None) => debug!("No demographic chart shown"),
            Err(e) => warn!(error = %e, "Failed to read demographics"),
        }
    }

    async fn read_comment_counts<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<CommentCounts> {
        let doc = Locator::document();
        let s = &self.selectors.comment_stats;
        let mut counts = CommentCounts::default();

        let Some(rows) = find_all(driver, &doc, &s.stat_count_info).await? else {
            return Ok(counts);
        };

        for index in 0..rows.count {
            let row = rows.item(&doc, index);
            let title = extract_text(driver, &row, &s.stat_title).await;
            let value = extract_number(&extract_text(driver, &row, &s.stat_value).await);

            match self.labels.count_label(&title) {
                Some(CountLabel::Current) => counts.active = value,
                Some(CountLabel::Deleted) => counts.deleted = value,
                Some(CountLabel::Removed) => counts.removed = value,
                None => debug!(title = %title, "Ignoring unknown count row"),
            }
        }

        Ok(counts)
    }

    async fn read_demographics<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<Option<Demographics>> {
        let doc = Locator::document();
        let s = &self.selectors.comment_stats;

        if find_first(driver, &doc, &s.demographic_stats_container, true).await.is_none() {
            return Ok(None);
        }

        let mut demographics = Demographics {
            male: extract_number(&extract_text(driver, &doc, &s.male_ratio).await),
            female: extract_number(&extract_text(driver, &doc, &s.female_ratio).await),
            ..Default::default()
        };

        if let Some(bars) = find_all(driver, &doc, &s.age_item).await? {
            for index in 0..bars.count {
                let bar = bars.item(&doc, index);
                let label = extract_text(driver, &bar, &s.age_label).await;
                let value = extract_number(&extract_text(driver, &bar, &s.age_value).await);

                let slot = match self.labels.age_bracket(&label) {
                    Some(AgeBracket::Teens) => &mut demographics.age_10s,
                    Some(AgeBracket::Twenties) => &mut demographics.age_20s,
                    Some(AgeBracket::Thirties) => &mut demographics.age_30s,
                    Some(AgeBracket::Forties) => &mut demographics.age_40s,
                    Some(AgeBracket::Fifties) => &mut demographics.age_50s,
                    Some(AgeBracket::SixtiesPlus) => &mut demographics.age_60plus,
                    None => continue,
                };
                *slot = value;
            }
        }

        Ok(Some(demographics))
    }

    /// Open the comment page, expand it, and read every comment.
    ///
    /// `Ok(None)` when the comment page could not be opened.
    async fn collect_comments<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<Option<Vec<CommentRecord>>> {
        if !self.open_comment_page(driver).await? {
            return Ok(None);
        }

        let toggle = CleanbotToggle::new(
            &self.selectors.cleanbot,
            self.labels,
            self.browser.click_settle(),
            self.browser.toggle_settle(),
        );
        let outcome = toggle.disable(driver).await;
        debug!(?outcome, "CleanBot handled");

        let loader = CommentLoader::new(
            &self.selectors.comments,
            &self.selectors.comment_navigation.comment_page_more_button,
            self.browser.click_settle(),
            self.cancel,
        );
        loader.load_all(driver).await;
        loader.extract_comments(driver).await.map(Some)
    }

    async fn open_comment_page<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<bool> {
        let doc = Locator::document();
        let nav = &self.selectors.comment_navigation;

        let Some(button) = find_first(driver, &doc, &nav.article_to_comment_button, true).await else {
            info!("Comment button missing or hidden, skipping comments");
            return Ok(false);
        };

        let clicked = driver
            .click(&button)
            .await
            .map_err(|e| ScrapeError::CommentSubsystem(format!("Failed to open comment page: {}", e)))?;
        if !clicked {
            info!("Comment button disappeared, skipping comments");
            return Ok(false);
        }
        sleep(self.browser.click_settle()).await;

        let list = &self.selectors.comments.comment_list;
        if !wait_for_presence(driver, &doc, list, self.browser.implicit_wait()).await {
            debug!("Comment list did not appear");
        }
        Ok(true)
    }
}
