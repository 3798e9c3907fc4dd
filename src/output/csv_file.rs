use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::app::{Result, ScrapeError};
use crate::output::TableRow;

/// Write `rows` with a header line, every field quoted.
pub fn write<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .map_err(|e| ScrapeError::write(path, e))?;

    writer
        .write_record(T::columns())
        .map_err(|e| ScrapeError::write(path, e))?;
    for row in rows {
        writer
            .write_record(row.cells())
            .map_err(|e| ScrapeError::write(path, e))?;
    }
    writer.flush().map_err(|e| ScrapeError::write(path, e))
}
