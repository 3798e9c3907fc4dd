use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::domain::article::TIMESTAMP_FORMAT;

/// Save URLs that still failed after every retry pass, for a later rerun.
///
/// Writes `failed_urls_<YYYYmmdd_HHMMSS>.txt` into `dir`. The report is a
/// convenience, so a write failure is only logged.
pub fn write_failed_urls(urls: &[String], dir: &Path) -> Option<PathBuf> {
    if urls.is_empty() {
        return None;
    }

    let now = Local::now();
    let path = dir.join(format!("failed_urls_{}.txt", now.format("%Y%m%d_%H%M%S")));
    let content = render(urls, &now.format(TIMESTAMP_FORMAT).to_string());

    match std::fs::write(&path, content) {
        Ok(()) => {
            info!(count = urls.len(), path = %path.display(), "Saved failed URLs");
            Some(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to save failed URLs");
            None
        }
    }
}

fn render(urls: &[String], generated_at: &str) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "# Failed URLs from scraping run");
    let _ = writeln!(content, "# Generated at: {}", generated_at);
    content.push('\n');
    for url in urls {
        content.push_str(url);
        content.push('\n');
    }
    content
}
