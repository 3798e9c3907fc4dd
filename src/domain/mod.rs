pub mod article;
pub mod comment;
pub mod run_state;

pub use article::{ArticleRecord, CommentCounts, Demographics, ARTICLE_COLUMNS};
pub use comment::{CommentRecord, COMMENT_COLUMNS, DELETED_COMMENT_CONTENT};
pub use run_state::RunState;
