use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to start browser session: {0}")]
    SessionCreation(String),

    #[error("Timed out after {timeout_secs}s loading {url}")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser error: {0}")]
    Driver(String),

    #[error("Required field '{field}' is empty on {url}")]
    FieldMissing { field: &'static str, url: String },

    #[error("Comment extraction failed: {0}")]
    CommentSubsystem(String),

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Whether a retry pass could plausibly succeed for this error.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScrapeError::NavigationTimeout { .. }
                | ScrapeError::Navigation { .. }
                | ScrapeError::Driver(_)
        )
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScrapeError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_errors_are_transient() {
        let timeout = ScrapeError::NavigationTimeout {
            url: "https://n.news.naver.com/article/001/1".into(),
            timeout_secs: 30,
        };
        assert!(timeout.is_transient());
        assert!(timeout.to_string().contains("30s"));

        let missing = ScrapeError::FieldMissing {
            field: "title",
            url: "https://n.news.naver.com/article/001/1".into(),
        };
        assert!(!missing.is_transient());
    }

    #[test]
    fn test_write_error_mentions_path() {
        let err = ScrapeError::write("/tmp/out/articles_a.csv", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to write /tmp/out/articles_a.csv: disk full"
        );
    }
}
