use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::app::{Result, ScrapeError};
use crate::config::selectors::CommentSelectors;
use crate::config::SelectorGroup;
use crate::domain::article::now_timestamp;
use crate::domain::CommentRecord;
use crate::scraper::driver::{Locator, PageDriver};
use crate::scraper::extractor::{extract_number, extract_text, find_all, find_first};

/// Attribute holding Naver's per-comment metadata (`commentNo:'…',deleted:false,…`).
const DATA_INFO: &str = "data-info";

/// Expands and reads the comment list on an opened comment page.
pub struct CommentLoader<'a> {
    selectors: &'a CommentSelectors,
    more_button: &'a SelectorGroup,
    settle: Duration,
    cancel: &'a AtomicBool,
}

impl<'a> CommentLoader<'a> {
    pub fn new(
        selectors: &'a CommentSelectors,
        more_button: &'a SelectorGroup,
        settle: Duration,
        cancel: &'a AtomicBool,
    ) -> Self {
        Self {
            selectors,
            more_button,
            settle,
            cancel,
        }
    }

    /// Click "more" until it disappears. Returns the number of clicks.
    ///
    /// Stops early on cancellation or a click error; whatever loaded so far
    /// stays on the page for [`extract_comments`](Self::extract_comments).
    pub async fn load_all<D: PageDriver + ?Sized>(&self, driver: &mut D) -> usize {
        let doc = Locator::document();
        let mut clicks = 0;

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                info!(clicks, "Stopped loading comments: shutdown requested");
                break;
            }

            let Some(button) = find_first(driver, &doc, self.more_button, true).await else {
                break;
            };

            match driver.click(&button).await {
                Ok(true) => {
                    clicks += 1;
                    debug!(clicks, "Loaded more comments");
                    sleep(self.settle).await;
                }
                Ok(false) => break,
                Err(e) => {
                    error!(error = %e, "Error while loading comments");
                    break;
                }
            }
        }

        info!(clicks, "All comments loaded");
        clicks
    }

    /// Read every comment node currently in the list.
    ///
    /// Nodes without metadata are skipped, as are nodes whose lookups fail;
    /// one bad node never drops the rest.
    pub async fn extract_comments<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<Vec<CommentRecord>> {
        let doc = Locator::document();
        let scraped_at = now_timestamp();

        let list = find_all(driver, &doc, &self.selectors.comment_list)
            .await
            .map_err(|e| ScrapeError::CommentSubsystem(format!("Failed to list comments: {}", e)))?;
        let Some(list) = list else {
            info!("Found 0 comments");
            return Ok(Vec::new());
        };

        info!(count = list.count, "Found comments");
        let mut comments = Vec::with_capacity(list.count);

        for index in 0..list.count {
            let node = list.item(&doc, index);
            match self.extract_one(driver, &node, &scraped_at).await {
                Ok(Some(comment)) => comments.push(comment),
                Ok(None) => debug!(index, "Skipping comment without metadata"),
                Err(e) => debug!(index, error = %e, "Skipping unreadable comment"),
            }
        }

        info!(extracted = comments.len(), "Comments extracted");
        Ok(comments)
    }

    async fn extract_one<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        node: &Locator,
        scraped_at: &str,
    ) -> Result<Option<CommentRecord>> {
        let Some(info) = driver.attribute(node, DATA_INFO).await?.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let selectors = self.selectors;
        let created_at = extract_text(driver, node, &selectors.comment_date).await;

        if is_deleted(&info) {
            let author = extract_text(driver, node, &selectors.deleted_comment_author).await;
            return Ok(Some(CommentRecord::deleted(author, created_at, scraped_at)));
        }

        let content = extract_text(driver, node, &selectors.comment_content).await;
        let author = extract_text(driver, node, &selectors.comment_author).await;
        let like_count = extract_number(&extract_text(driver, node, &selectors.comment_like).await);
        let dislike_count = extract_number(&extract_text(driver, node, &selectors.comment_dislike).await);

        Ok(Some(CommentRecord::live(
            content,
            author,
            like_count,
            dislike_count,
            created_at,
            scraped_at,
        )))
    }
}

fn is_deleted(info: &str) -> bool {
    let compact: String = info.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains("deleted:true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::domain::DELETED_COMMENT_CONTENT;
    use crate::scraper::fake::{FakeDriver, FakePage};

    const URL: &str = "https://n.news.naver.com/article/comment/001/0014000001";

    fn comment(no: u32, deleted: bool, body: &str) -> String {
        format!(
            r#"<li class="u_cbox_comment" data-info="commentNo:'{no}',deleted:{deleted},blind:false">
                <span class="u_cbox_nick">user{no}</span>
                <span class="u_cbox_contents">{body}</span>
                <em class="u_cbox_cnt_recomm">{no}</em>
                <em class="u_cbox_cnt_unrecomm">0</em>
                <span class="u_cbox_date">2024.01.15. 10:3{no}</span>
            </li>"#
        )
    }

    fn page(items: &[String], more: bool) -> String {
        let button = if more {
            r#"<div class="u_cbox_paginate"><a class="u_cbox_btn_more">더보기</a></div>"#
        } else {
            ""
        };
        format!(
            r#"<html><body><ul class="u_cbox_list">{}</ul>{}</body></html>"#,
            items.concat(),
            button
        )
    }

    async fn open(page: FakePage) -> FakeDriver {
        let mut driver = FakeDriver::new().with_page(URL, page);
        driver.navigate(URL).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_extract_reads_live_and_deleted_comments() {
        let html = page(
            &[
                comment(1, false, "좋은 기사"),
                comment(2, true, ""),
                r#"<li class="u_cbox_comment"><span class="u_cbox_contents">no metadata</span></li>"#.to_string(),
            ],
            false,
        );
        let mut driver = open(FakePage::single(&html)).await;
        let config = SelectorConfig::default();
        let cancel = AtomicBool::new(false);
        let loader = CommentLoader::new(
            &config.comments,
            &config.comment_navigation.comment_page_more_button,
            Duration::ZERO,
            &cancel,
        );

        let comments = loader.extract_comments(&mut driver).await.unwrap();
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].content, "좋은 기사");
        assert_eq!(comments[0].author, "user1");
        assert_eq!(comments[0].like_count, "1");
        assert_eq!(comments[0].dislike_count, "0");
        assert_eq!(comments[0].created_at, "2024.01.15. 10:31");

        assert_eq!(comments[1].content, DELETED_COMMENT_CONTENT);
        assert_eq!(comments[1].author, "user2");
        assert_eq!(comments[1].like_count, "");
        assert_eq!(comments[1].dislike_count, "");
        assert_eq!(comments[1].created_at, "2024.01.15. 10:32");
        assert!(comments[1].is_deleted());
    }

    #[tokio::test]
    async fn test_reaction_counts_keep_only_digits() {
        let html = page(&[comment(1, false, "a")], false)
            .replace(">1</em>", ">공감 1,234</em>")
            .replace(">0</em>", ">비공감 56</em>");
        let mut driver = open(FakePage::single(&html)).await;
        let config = SelectorConfig::default();
        let cancel = AtomicBool::new(false);
        let loader = CommentLoader::new(
            &config.comments,
            &config.comment_navigation.comment_page_more_button,
            Duration::ZERO,
            &cancel,
        );

        let comments = loader.extract_comments(&mut driver).await.unwrap();
        assert_eq!(comments[0].like_count, "1234");
        assert_eq!(comments[0].dislike_count, "56");
    }

    #[tokio::test]
    async fn test_load_all_clicks_until_button_disappears() {
        let first = page(&[comment(1, false, "a")], true);
        let second = page(&[comment(1, false, "a"), comment(2, false, "b")], true);
        let third = page(&[comment(1, false, "a"), comment(2, false, "b"), comment(3, false, "c")], false);
        let fake = FakePage::single(&first)
            .on_click(".u_cbox_btn_more", &second)
            .on_click(".u_cbox_btn_more", &third);
        let mut driver = open(fake).await;

        let config = SelectorConfig::default();
        let cancel = AtomicBool::new(false);
        let loader = CommentLoader::new(
            &config.comments,
            &config.comment_navigation.comment_page_more_button,
            Duration::ZERO,
            &cancel,
        );

        assert_eq!(loader.load_all(&mut driver).await, 2);
        assert_eq!(loader.extract_comments(&mut driver).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_load_all_stops_when_cancelled() {
        let html = page(&[comment(1, false, "a")], true);
        let mut driver = open(FakePage::single(&html)).await;

        let config = SelectorConfig::default();
        let cancel = AtomicBool::new(true);
        let loader = CommentLoader::new(
            &config.comments,
            &config.comment_navigation.comment_page_more_button,
            Duration::ZERO,
            &cancel,
        );

        assert_eq!(loader.load_all(&mut driver).await, 0);
    }

    #[tokio::test]
    async fn test_list_failure_is_a_comment_error() {
        let html = page(&[comment(1, false, "a")], false);
        let mut driver = FakeDriver::new()
            .with_page(URL, FakePage::single(&html))
            .fail_lookups("u_cbox_comment");
        driver.navigate(URL).await.unwrap();

        let config = SelectorConfig::default();
        let cancel = AtomicBool::new(false);
        let loader = CommentLoader::new(
            &config.comments,
            &config.comment_navigation.comment_page_more_button,
            Duration::ZERO,
            &cancel,
        );

        let err = loader.extract_comments(&mut driver).await.unwrap_err();
        assert!(matches!(err, ScrapeError::CommentSubsystem(_)));
    }

    #[test]
    fn test_is_deleted_ignores_spacing() {
        assert!(is_deleted("commentNo:'9', deleted: true, blind:false"));
        assert!(!is_deleted("commentNo:'9',deleted:false"));
    }
}
