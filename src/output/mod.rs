//! Writing run results to disk.
//!
//! Articles and comments each go to their own table file. A table with no
//! rows produces no file.

mod csv_file;
mod excel_file;
mod failed;
mod json_file;

pub use failed::write_failed_urls;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::Result;
use crate::domain::{ArticleRecord, CommentRecord, ARTICLE_COLUMNS, COMMENT_COLUMNS};

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Excel,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Excel => "xlsx",
        }
    }
}

/// Output options (`[output]`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output file format (default: csv)
    pub format: OutputFormat,

    /// Prepended to every output file name when not empty
    pub filename_prefix: String,

    /// Append the write time to output file names (default: false)
    pub include_timestamp: bool,
}

/// A record type that can be written as a table.
pub trait TableRow: Serialize {
    /// Base name of the table file.
    const TABLE: &'static str;

    fn columns() -> &'static [&'static str];

    /// Cell values in [`columns`](TableRow::columns) order.
    fn cells(&self) -> Vec<String>;
}

impl TableRow for ArticleRecord {
    const TABLE: &'static str = "articles";

    fn columns() -> &'static [&'static str] {
        &ARTICLE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        self.to_row()
    }
}

impl TableRow for CommentRecord {
    const TABLE: &'static str = "comments";

    fn columns() -> &'static [&'static str] {
        &COMMENT_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        self.to_row()
    }
}

/// Files produced by [`write_results`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub articles: Option<PathBuf>,
    pub comments: Option<PathBuf>,
}

/// File name for `table`: `[<prefix>_]<table>_<suffix>[_<timestamp>].<ext>`.
pub fn output_file_name(settings: &OutputSettings, table: &str, suffix: &str, timestamp: Option<&str>) -> String {
    let mut name = String::new();
    if !settings.filename_prefix.is_empty() {
        name.push_str(&settings.filename_prefix);
        name.push('_');
    }
    name.push_str(table);
    if !suffix.is_empty() {
        name.push('_');
        name.push_str(suffix);
    }
    if let Some(timestamp) = timestamp {
        name.push('_');
        name.push_str(timestamp);
    }
    name.push('.');
    name.push_str(settings.format.extension());
    name
}

/// Name fragment identifying a run, taken from its URL list file name.
pub fn run_suffix(urls_path: &Path) -> String {
    urls_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "urls".to_string())
}

/// Write both tables into `dir`. Any write failure aborts.
pub fn write_results(
    articles: &[ArticleRecord],
    comments: &[CommentRecord],
    settings: &OutputSettings,
    dir: &Path,
    suffix: &str,
) -> Result<WrittenFiles> {
    let timestamp = settings
        .include_timestamp
        .then(|| Local::now().format("%Y%m%d_%H%M%S").to_string());

    Ok(WrittenFiles {
        articles: write_table(articles, settings, dir, suffix, timestamp.as_deref())?,
        comments: write_table(comments, settings, dir, suffix, timestamp.as_deref())?,
    })
}

fn write_table<T: TableRow>(
    rows: &[T],
    settings: &OutputSettings,
    dir: &Path,
    suffix: &str,
    timestamp: Option<&str>,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        info!(table = T::TABLE, "No rows, skipping file");
        return Ok(None);
    }

    let path = dir.join(output_file_name(settings, T::TABLE, suffix, timestamp));
    match settings.format {
        OutputFormat::Csv => csv_file::write(&path, rows)?,
        OutputFormat::Json => json_file::write(&path, rows)?,
        OutputFormat::Excel => excel_file::write(&path, rows)?,
    }

    info!(table = T::TABLE, rows = rows.len(), path = %path.display(), "Wrote table");
    Ok(Some(path))
}
