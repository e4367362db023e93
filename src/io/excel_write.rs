use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{error, info};

use crate::error::{Result, ToolError};
use crate::layout::{CellContent, CellStyle, ReportSheet, build_report};
use crate::model::{CategorySet, FacilitySummary};

/// File name used for a report generated on `date`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("summary_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Writes the report to the given path.
pub fn write_report(path: &Path, report: &ReportSheet) -> Result<()> {
    let mut workbook = render(report)?;
    workbook.save(path).map_err(export_error)?;
    Ok(())
}

/// Serialises the report into xlsx bytes.
pub fn report_to_buffer(report: &ReportSheet) -> Result<Vec<u8>> {
    let mut workbook = render(report)?;
    workbook.save_to_buffer().map_err(export_error)
}

/// Lays out and writes the summary report.
///
/// Export is a side output: failures are logged and reported as `false`
/// instead of being returned to the caller.
pub fn export_summary(
    summary: &FacilitySummary,
    categories: &CategorySet,
    period: &str,
    path: &Path,
) -> bool {
    let report = build_report(summary, categories, period);
    match write_report(path, &report) {
        Ok(()) => {
            info!(output = %path.display(), "summary report written");
            true
        }
        Err(cause) => {
            error!(output = %path.display(), %cause, "summary report export failed");
            false
        }
    }
}

fn render(report: &ReportSheet) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, report).map_err(export_error)?;
    Ok(workbook)
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    report: &ReportSheet,
) -> std::result::Result<(), rust_xlsxwriter::XlsxError> {
    worksheet.set_name(&report.sheet_name)?;

    for (col_idx, width) in report.column_widths.iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, *width)?;
    }

    for range in &report.merges {
        worksheet.merge_range(
            range.first_row,
            range.first_col,
            range.last_row,
            range.last_col,
            &range.text,
            &format_for(range.style),
        )?;
    }

    for cell in &report.cells {
        let format = format_for(cell.style);
        match &cell.content {
            CellContent::Text(text) => {
                worksheet.write_string_with_format(cell.row, cell.col, text.as_str(), &format)?;
            }
            CellContent::Number(value) => {
                worksheet.write_number_with_format(cell.row, cell.col, *value as f64, &format)?;
            }
            CellContent::Blank => {
                worksheet.write_blank(cell.row, cell.col, &format)?;
            }
        }
    }

    Ok(())
}

fn format_for(style: CellStyle) -> Format {
    let bordered = Format::new().set_border(FormatBorder::Thin);
    match style {
        CellStyle::Title => Format::new()
            .set_bold()
            .set_font_size(14)
            .set_align(FormatAlign::Center),
        CellStyle::Subtitle => Format::new().set_italic().set_align(FormatAlign::Center),
        CellStyle::Header => bordered
            .set_bold()
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        CellStyle::Index => bordered.set_align(FormatAlign::Center),
        CellStyle::Label => bordered.set_text_wrap(),
        CellStyle::Count => bordered.set_align(FormatAlign::Center),
        CellStyle::TotalLabel => bordered.set_bold().set_align(FormatAlign::Right),
        CellStyle::Total => bordered.set_bold().set_align(FormatAlign::Center),
    }
}

fn export_error(error: rust_xlsxwriter::XlsxError) -> ToolError {
    ToolError::Export(error.to_string())
}
