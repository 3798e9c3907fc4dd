use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::app::{Result, ScrapeError};
use crate::output::TableRow;

/// Longest string a worksheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// Write `rows` to a single worksheet with a bold header row.
pub fn write<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    build(rows)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| ScrapeError::write(path, e))
}

fn build<T: TableRow>(rows: &[T]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(T::TABLE)?;

    for (col, name) in T::columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let excel_row = index as u32 + 1;
        for (col, value) in row.cells().iter().enumerate() {
            worksheet.write_string(excel_row, col as u16, clip(value))?;
        }
    }

    Ok(workbook)
}

fn clip(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
