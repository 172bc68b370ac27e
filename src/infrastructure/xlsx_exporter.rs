//! Spreadsheet export: one worksheet per named table, saved in a single write

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::domain::errors::ExportError;
use crate::domain::services::table::{Cell, NamedTable, Table};

/// Write every table as its own sheet of a new workbook at `path`.
///
/// Sheets are built in memory first; nothing touches the filesystem until the
/// final save. An existing file at `path` is replaced.
pub fn export(tables: &[NamedTable], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for named in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&named.name)?;
        write_table(worksheet, &named.table, &header)?;
        info!(
            "Sheet {} ready: {} columns, {} rows",
            named.name,
            named.table.columns.len(),
            named.table.rows.len()
        );
    }

    workbook.save(path)?;
    info!("Saved {} sheets to {}", tables.len(), path.display());
    Ok(())
}

/// Header on row 0, zero-based row index in column 0, data after that
fn write_table(
    worksheet: &mut Worksheet,
    table: &Table,
    header: &Format,
) -> Result<(), ExportError> {
    worksheet.write_blank(0, 0, header)?;
    for (i, column) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_index(i + 1)?, column, header)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let sheet_row = row_index(r + 1)?;
        worksheet.write_number(sheet_row, 0, r as f64)?;
        for (c, cell) in row.iter().enumerate() {
            let sheet_col = col_index(c + 1)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(sheet_row, sheet_col, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(sheet_row, sheet_col, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(sheet_row, sheet_col, *b)?;
                }
            }
        }
    }
    Ok(())
}

fn row_index(i: usize) -> Result<u32, ExportError> {
    u32::try_from(i).map_err(|_| ExportError::TooLarge(format!("row {}", i)))
}

fn col_index(i: usize) -> Result<u16, ExportError> {
    u16::try_from(i).map_err(|_| ExportError::TooLarge(format!("column {}", i)))
}
