use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xlsx};
use tracing::{debug, instrument};

use crate::config::{ReportConfig, SheetLayout};
use crate::error::{Result, ToolError};
use crate::io::upload::{Upload, check_upload};
use crate::model::{CellValue, RawRow, SourceFile};
use crate::validate::{ColumnSchema, Field};

/// Reads the first sheet of an in-memory workbook into raw rows.
///
/// The row at `layout.header_row` supplies the column keys; every later row
/// becomes a [`RawRow`] tagged with its 1-indexed sheet row. Blank rows and
/// totals rows are dropped.
pub fn read_rows(
    bytes: &[u8],
    layout: &SheetLayout,
    schema: &ColumnSchema,
) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no sheets".into()))??;

    let rows = rows_from_range(&range, layout)?;
    Ok(rows
        .into_iter()
        .filter(|row| !row.is_blank() && !is_totals_row(row, layout, schema))
        .collect())
}

/// Gate, open, and filter a single upload.
#[instrument(level = "debug", skip_all, fields(file = %upload.file_name))]
pub fn read_source_file(
    upload: &Upload,
    config: &ReportConfig,
    schema: &ColumnSchema,
) -> Result<SourceFile> {
    check_upload(upload, &config.upload)?;
    let rows = read_rows(&upload.bytes, &config.sheet, schema)?;
    if rows.is_empty() {
        return Err(ToolError::EmptyFile(upload.file_name.clone()));
    }
    debug!(row_count = rows.len(), "read rows from workbook");
    Ok(SourceFile {
        file_name: upload.file_name.clone(),
        rows,
    })
}

fn rows_from_range(range: &Range<DataType>, layout: &SheetLayout) -> Result<Vec<RawRow>> {
    if range.is_empty() {
        return Ok(Vec::new());
    }
    let header_index = layout.header_row.checked_sub(1).ok_or_else(|| {
        ToolError::InvalidWorkbook("header row must be 1 or greater".into())
    })?;
    let start_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let end_row = range.end().map(|(row, _)| row).unwrap_or(0);
    if header_index >= end_row {
        // Nothing below the header, so no data rows.
        return Ok(Vec::new());
    }

    let missing_header = || {
        ToolError::InvalidWorkbook(format!("header row {} not found", layout.header_row))
    };
    let offset = header_index.checked_sub(start_row).ok_or_else(missing_header)?;
    let headers: Vec<String> = range
        .rows()
        .nth(offset as usize)
        .ok_or_else(missing_header)?
        .iter()
        .map(|cell| cell_to_string(Some(cell)).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (position, cells) in range.rows().enumerate().skip(offset as usize + 1) {
        let sheet_row = start_row + position as u32 + 1;
        let mut row = RawRow::new(Some(sheet_row));
        for (col_idx, cell) in cells.iter().enumerate() {
            let Some(header) = headers.get(col_idx).filter(|h| !h.is_empty()) else {
                continue;
            };
            row.cells.insert(header.clone(), cell_to_value(cell));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn is_totals_row(row: &RawRow, layout: &SheetLayout, schema: &ColumnSchema) -> bool {
    let Some(category) = schema.lookup(row, Field::Category) else {
        return false;
    };
    let text = category.to_text().to_lowercase();
    layout
        .total_markers
        .iter()
        .any(|marker| !marker.is_empty() && text.contains(&marker.to_lowercase()))
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::String(value) => CellValue::String(value.clone()),
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        other => CellValue::String(cell_to_string(Some(other))),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
