use crate::domain::{ArticleRecord, CommentRecord};

/// Accumulated output of one scraping run.
///
/// Ids are handed out only when an article is committed, so a URL that fails
/// never consumes an id and an article's comments always reference a row
/// that is already in the table.
#[derive(Debug, Clone)]
pub struct RunState {
    pub articles: Vec<ArticleRecord>,
    pub comments: Vec<CommentRecord>,
    pub failed_urls: Vec<String>,
    next_article_id: u64,
    next_comment_id: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            comments: Vec::new(),
            failed_urls: Vec::new(),
            next_article_id: 1,
            next_comment_id: 1,
        }
    }

    /// Append an article and its comments, assigning ids. Returns the article id.
    pub fn commit(&mut self, mut article: ArticleRecord, comments: Vec<CommentRecord>) -> u64 {
        let article_id = self.next_article_id;
        self.next_article_id += 1;

        article.article_id = article_id;
        self.articles.push(article);

        for mut comment in comments {
            comment.article_id = article_id;
            comment.comment_id = self.next_comment_id;
            self.next_comment_id += 1;
            self.comments.push(comment);
        }

        article_id
    }

    pub fn record_failure(&mut self, url: &str) {
        self.failed_urls.push(url.to_string());
    }

    /// Hand the current failure list to a retry pass, leaving it empty.
    pub fn take_failures(&mut self) -> Vec<String> {
        std::mem::take(&mut self.failed_urls)
    }
}
