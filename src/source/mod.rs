//! Reading the list of article URLs to scrape.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::app::Result;

/// Load URLs from a text file, one per line.
///
/// Blank lines and `#` comments are skipped. Lines that aren't absolute
/// http(s) URLs are skipped with a warning, as are repeats.
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let urls = parse_urls(&content);
    info!(count = urls.len(), path = %path.display(), "Loaded URLs");
    Ok(urls)
}

pub fn parse_urls(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Err(reason) = check_url(line) {
            warn!(line = line_no, url = line, reason, "Skipping invalid URL");
            continue;
        }

        if !seen.insert(line.to_string()) {
            warn!(line = line_no, url = line, "Skipping duplicate URL");
            continue;
        }

        urls.push(line.to_string());
    }

    urls
}

fn check_url(line: &str) -> std::result::Result<(), &'static str> {
    if !line.starts_with("http") {
        return Err("not an http(s) URL");
    }
    match Url::parse(line) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(_) => Err("not an http(s) URL"),
        Err(_) => Err("malformed URL"),
    }
}
