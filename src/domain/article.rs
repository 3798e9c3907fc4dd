use chrono::Local;
use serde::{Deserialize, Serialize};

/// Column order of the articles table.
pub const ARTICLE_COLUMNS: [&str; 21] = [
    "article_id",
    "url",
    "title",
    "content",
    "author",
    "publish_date",
    "category",
    "like_count",
    "comment_count",
    "active_comment_count",
    "deleted_comment_count",
    "removed_comment_count",
    "male_ratio",
    "female_ratio",
    "age_10s_ratio",
    "age_20s_ratio",
    "age_30s_ratio",
    "age_40s_ratio",
    "age_50s_ratio",
    "age_60plus_ratio",
    "scraped_at",
];

/// Timestamp format shared by `scraped_at` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One row of the articles table.
///
/// Counts and ratios are kept as the digit strings read from the page so that
/// "not collected" (empty) stays distinguishable from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub article_id: u64,
    pub url: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date: String,
    pub category: String,
    pub like_count: String,
    pub comment_count: String,
    pub active_comment_count: String,
    pub deleted_comment_count: String,
    pub removed_comment_count: String,
    pub male_ratio: String,
    pub female_ratio: String,
    pub age_10s_ratio: String,
    pub age_20s_ratio: String,
    pub age_30s_ratio: String,
    pub age_40s_ratio: String,
    pub age_50s_ratio: String,
    pub age_60plus_ratio: String,
    pub scraped_at: String,
}

/// Active/deleted/removed counts from the comment summary box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCounts {
    pub active: String,
    pub deleted: String,
    pub removed: String,
}

impl Default for CommentCounts {
    fn default() -> Self {
        Self {
            active: "0".to_string(),
            deleted: "0".to_string(),
            removed: "0".to_string(),
        }
    }
}

/// Gender and age distribution of commenters, in percent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub male: String,
    pub female: String,
    pub age_10s: String,
    pub age_20s: String,
    pub age_30s: String,
    pub age_40s: String,
    pub age_50s: String,
    pub age_60plus: String,
}

impl ArticleRecord {
    /// Create a record for `url` with every comment statistic left empty.
    ///
    /// The id is 0 until the run commits the record.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            scraped_at: now_timestamp(),
            ..Default::default()
        }
    }

    /// Whether the article advertises no comments at all.
    ///
    /// This compares the normalized count text with the literal `"0"`; an
    /// unreadable count (empty string) still goes through comment processing.
    pub fn has_no_comments(&self) -> bool {
        self.comment_count == "0"
    }

    pub fn apply_counts(&mut self, counts: CommentCounts) {
        self.active_comment_count = counts.active;
        self.deleted_comment_count = counts.deleted;
        self.removed_comment_count = counts.removed;
    }

    pub fn apply_demographics(&mut self, demographics: Demographics) {
        self.male_ratio = demographics.male;
        self.female_ratio = demographics.female;
        self.age_10s_ratio = demographics.age_10s;
        self.age_20s_ratio = demographics.age_20s;
        self.age_30s_ratio = demographics.age_30s;
        self.age_40s_ratio = demographics.age_40s;
        self.age_50s_ratio = demographics.age_50s;
        self.age_60plus_ratio = demographics.age_60plus;
    }

    /// Whether any comment statistic has been filled in.
    pub fn has_comment_stats(&self) -> bool {
        [
            &self.active_comment_count,
            &self.deleted_comment_count,
            &self.removed_comment_count,
            &self.male_ratio,
            &self.female_ratio,
            &self.age_10s_ratio,
            &self.age_20s_ratio,
            &self.age_30s_ratio,
            &self.age_40s_ratio,
            &self.age_50s_ratio,
            &self.age_60plus_ratio,
        ]
        .iter()
        .any(|v| !v.is_empty())
    }

    /// Cell values in [`ARTICLE_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.article_id.to_string(),
            self.url.clone(),
            self.title.clone(),
            self.content.clone(),
            self.author.clone(),
            self.publish_date.clone(),
            self.category.clone(),
            self.like_count.clone(),
            self.comment_count.clone(),
            self.active_comment_count.clone(),
            self.deleted_comment_count.clone(),
            self.removed_comment_count.clone(),
            self.male_ratio.clone(),
            self.female_ratio.clone(),
            self.age_10s_ratio.clone(),
            self.age_20s_ratio.clone(),
            self.age_30s_ratio.clone(),
            self.age_40s_ratio.clone(),
            self.age_50s_ratio.clone(),
            self.age_60plus_ratio.clone(),
            self.scraped_at.clone(),
        ]
    }
}
