#![allow(dead_code)]

use inspection_tools::io::upload::Upload;
use inspection_tools::model::{DEFAULT_CATEGORIES, ValidatedFile, ValidatedRow};
use rust_xlsxwriter::Workbook;

pub const HEADERS: [&str; 5] = ["No.", "Category", "Inspected", "Compliant", "With smoking room"];
pub const LEGACY_HEADERS: [&str; 5] = [
    "No.",
    "Category",
    "Inspected",
    "Meeting requirements",
    "Smoking rooms",
];

/// Cell content for fixture sheets.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Owned(String),
    Num(f64),
    Empty,
}

/// Builds an xlsx file shaped like an inspector export: title lines in rows
/// 1-2, headers in row 5, data from row 6 on.
pub fn workbook_bytes(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let preamble = vec![
        vec![Cell::Text("Smoking ban inspections")],
        vec![Cell::Text("Inspector export")],
    ];
    workbook_with_preamble(&preamble, headers, rows)
}

/// Like [`workbook_bytes`] but with caller-chosen content in rows 1-4.
pub fn workbook_with_preamble(
    preamble: &[Vec<Cell>],
    headers: &[&str],
    rows: &[Vec<Cell>],
) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(4, col as u16, *header).unwrap();
    }
    let placed = preamble
        .iter()
        .take(4)
        .enumerate()
        .map(|(offset, cells)| (offset as u32, cells))
        .chain(
            rows.iter()
                .enumerate()
                .map(|(offset, cells)| (5 + offset as u32, cells)),
        );
    for (row, cells) in placed {
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, *text).unwrap();
                }
                Cell::Owned(text) => {
                    worksheet.write_string(row, col, text.as_str()).unwrap();
                }
                Cell::Num(value) => {
                    worksheet.write_number(row, col, *value).unwrap();
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Data row for one category with the given counters.
pub fn data_row(index: usize, category: &str, counts: (u64, u64, u64)) -> Vec<Cell> {
    vec![
        Cell::Num(index as f64),
        Cell::Owned(category.to_string()),
        Cell::Num(counts.0 as f64),
        Cell::Num(counts.1 as f64),
        Cell::Num(counts.2 as f64),
    ]
}

/// All ten canonical categories with identical counters.
pub fn full_rows(counts: (u64, u64, u64)) -> Vec<Vec<Cell>> {
    DEFAULT_CATEGORIES
        .iter()
        .enumerate()
        .map(|(index, category)| data_row(index + 1, category, counts))
        .collect()
}

pub fn full_upload(name: &str, counts: (u64, u64, u64)) -> Upload {
    Upload::new(name, workbook_bytes(&HEADERS, &full_rows(counts)))
}

pub fn row(category: &str, sheet_row: Option<u32>, counts: (u64, u64, u64)) -> ValidatedRow {
    ValidatedRow {
        category: category.to_string(),
        inspected: counts.0,
        compliant: counts.1,
        smoking_room: counts.2,
        sheet_row,
    }
}

/// Validated file covering every category, rows placed inside the window.
pub fn full_file(name: &str, counts: (u64, u64, u64)) -> ValidatedFile {
    ValidatedFile {
        file_name: name.to_string(),
        rows: DEFAULT_CATEGORIES
            .iter()
            .enumerate()
            .map(|(index, category)| row(category, Some(6 + index as u32), counts))
            .collect(),
    }
}
