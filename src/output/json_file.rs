use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::{Result, ScrapeError};
use crate::output::TableRow;

/// Write `rows` as a pretty-printed JSON array of objects.
pub fn write<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| ScrapeError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|e| ScrapeError::write(path, e))?;
    writer.flush().map_err(|e| ScrapeError::write(path, e))
}
