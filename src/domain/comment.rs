use serde::{Deserialize, Serialize};

/// Column order of the comments table.
pub const COMMENT_COLUMNS: [&str; 11] = [
    "article_id",
    "comment_id",
    "parent_comment_id",
    "comment_type",
    "content",
    "author",
    "like_count",
    "dislike_count",
    "reply_count",
    "created_at",
    "scraped_at",
];

/// Content written in place of a comment its author deleted.
pub const DELETED_COMMENT_CONTENT: &str = "삭제된 댓글입니다";

/// One row of the comments table.
///
/// `parent_comment_id`, `comment_type` and `reply_count` are part of the
/// table layout but are not collected yet; they are always written empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub article_id: u64,
    pub comment_id: u64,
    pub parent_comment_id: String,
    pub comment_type: String,
    pub content: String,
    pub author: String,
    pub like_count: String,
    pub dislike_count: String,
    pub reply_count: String,
    pub created_at: String,
    pub scraped_at: String,
}

impl CommentRecord {
    /// A live comment. Ids are assigned when the run commits it.
    pub fn live(
        content: String,
        author: String,
        like_count: String,
        dislike_count: String,
        created_at: String,
        scraped_at: &str,
    ) -> Self {
        Self {
            content,
            author,
            like_count,
            dislike_count,
            created_at,
            scraped_at: scraped_at.to_string(),
            ..Default::default()
        }
    }

    /// A deleted comment: sentinel content and no reaction counts.
    pub fn deleted(author: String, created_at: String, scraped_at: &str) -> Self {
        Self {
            content: DELETED_COMMENT_CONTENT.to_string(),
            author,
            created_at,
            scraped_at: scraped_at.to_string(),
            ..Default::default()
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.content == DELETED_COMMENT_CONTENT
            && self.like_count.is_empty()
            && self.dislike_count.is_empty()
    }

    /// Cell values in [`COMMENT_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.article_id.to_string(),
            self.comment_id.to_string(),
            self.parent_comment_id.clone(),
            self.comment_type.clone(),
            self.content.clone(),
            self.author.clone(),
            self.like_count.clone(),
            self.dislike_count.clone(),
            self.reply_count.clone(),
            self.created_at.clone(),
            self.scraped_at.clone(),
        ]
    }
}
