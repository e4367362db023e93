//! Structural description of the summary report workbook.
//!
//! Downstream consumers read the report positionally, so every row, merge and
//! column width here is part of the output contract. The description is pure
//! data; [`excel_write`](crate::io::excel_write) turns it into a workbook.

use crate::model::{Bucket, CategorySet, FacilitySummary};

/// Name of the single worksheet in the report.
pub const REPORT_SHEET: &str = "Summary";
/// Title written in the first row.
pub const REPORT_TITLE: &str = "Inspections of compliance with the smoking ban";
/// Grouping header spanning the three counter columns.
pub const COUNTERS_HEADER: &str = "Number of facilities";
/// Label of the grand totals row.
pub const TOTAL_LABEL: &str = "Total";

/// 0-indexed row of the first header line.
pub const HEADER_ROW: u32 = 3;
/// 0-indexed row of the first category line.
pub const FIRST_CATEGORY_ROW: u32 = HEADER_ROW + 2;
/// Index, label and three counters.
pub const COLUMN_COUNT: u16 = 5;
/// Column widths, A to E, in Excel character units.
pub const COLUMN_WIDTHS: [f64; COLUMN_COUNT as usize] = [6.0, 48.0, 18.0, 18.0, 18.0];

const COUNTER_HEADERS: [&str; 3] = ["inspected", "compliant with the ban", "with a smoking room"];

/// Visual role of a cell; mapped onto concrete formats by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Title,
    Subtitle,
    Header,
    Index,
    Label,
    Count,
    TotalLabel,
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    Number(u64),
    /// Formatted but empty; used for zero counters.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCell {
    pub row: u32,
    pub col: u16,
    pub content: CellContent,
    pub style: CellStyle,
}

/// Inclusive rectangle written as one merged cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
    pub text: String,
    pub style: CellStyle,
}

/// Everything needed to materialise the report worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub sheet_name: String,
    pub column_widths: Vec<f64>,
    pub merges: Vec<MergedRange>,
    pub cells: Vec<ReportCell>,
}

impl ReportSheet {
    /// Cell written at the given position, if any.
    pub fn cell(&self, row: u32, col: u16) -> Option<&ReportCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }

    /// 0-indexed row of the grand totals line.
    pub fn totals_row(&self) -> u32 {
        self.cells
            .iter()
            .filter(|cell| cell.style == CellStyle::Total)
            .map(|cell| cell.row)
            .max()
            .unwrap_or(FIRST_CATEGORY_ROW)
    }
}

/// Lays out the summary for the given period.
///
/// Categories follow the canonical order of `categories`; buckets missing
/// from `summary` are treated as zero.
pub fn build_report(
    summary: &FacilitySummary,
    categories: &CategorySet,
    period: &str,
) -> ReportSheet {
    let last_col = COLUMN_COUNT - 1;
    let mut merges = vec![
        merged(0, 0, 0, last_col, REPORT_TITLE, CellStyle::Title),
        merged(1, 0, 1, last_col, &format!("Period: {period}"), CellStyle::Subtitle),
        merged(HEADER_ROW, 0, HEADER_ROW + 1, 0, "No.", CellStyle::Header),
        merged(HEADER_ROW, 1, HEADER_ROW + 1, 1, "Facility category", CellStyle::Header),
        merged(HEADER_ROW, 2, HEADER_ROW, last_col, COUNTERS_HEADER, CellStyle::Header),
    ];

    let mut cells = Vec::new();
    for (offset, header) in COUNTER_HEADERS.iter().enumerate() {
        cells.push(ReportCell {
            row: HEADER_ROW + 1,
            col: 2 + offset as u16,
            content: CellContent::Text(header.to_string()),
            style: CellStyle::Header,
        });
    }

    let mut row = FIRST_CATEGORY_ROW;
    for (index, label) in categories.labels().iter().enumerate() {
        let bucket = summary.get(label).copied().unwrap_or_default();
        cells.push(ReportCell {
            row,
            col: 0,
            content: CellContent::Number(index as u64 + 1),
            style: CellStyle::Index,
        });
        cells.push(ReportCell {
            row,
            col: 1,
            content: CellContent::Text(label.clone()),
            style: CellStyle::Label,
        });
        for (offset, value) in counters(&bucket).into_iter().enumerate() {
            let content = if value == 0 {
                CellContent::Blank
            } else {
                CellContent::Number(value)
            };
            cells.push(ReportCell {
                row,
                col: 2 + offset as u16,
                content,
                style: CellStyle::Count,
            });
        }
        row += 1;
    }

    merges.push(merged(row, 0, row, 1, TOTAL_LABEL, CellStyle::TotalLabel));
    for (offset, value) in counters(&summary.totals()).into_iter().enumerate() {
        cells.push(ReportCell {
            row,
            col: 2 + offset as u16,
            content: CellContent::Number(value),
            style: CellStyle::Total,
        });
    }

    ReportSheet {
        sheet_name: REPORT_SHEET.to_string(),
        column_widths: COLUMN_WIDTHS.to_vec(),
        merges,
        cells,
    }
}

fn counters(bucket: &Bucket) -> [u64; 3] {
    [bucket.inspected, bucket.compliant, bucket.with_smoking_room]
}

fn merged(
    first_row: u32,
    first_col: u16,
    last_row: u32,
    last_col: u16,
    text: &str,
    style: CellStyle,
) -> MergedRange {
    MergedRange {
        first_row,
        first_col,
        last_row,
        last_col,
        text: text.to_string(),
        style,
    }
}
