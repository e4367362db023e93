//! Folds validated rows from many files into one [`FacilitySummary`].
//!
//! The fold is pure addition keyed by canonical position, so the result does
//! not depend on the order of files or of rows within a file.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RowWindow;
use crate::model::{Bucket, CategorySet, FacilitySummary, ValidatedFile, ValidatedRow};

/// Soft findings raised while aggregating. None of them stop the fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Row inside the window whose category is not canonical; skipped.
    UnknownCategory {
        file_name: String,
        sheet_row: Option<u32>,
        category: String,
    },
    /// Row with data outside the window; skipped.
    OutsideWindow {
        file_name: String,
        sheet_row: u32,
        category: String,
    },
    /// Category seen more than once within one file's window; every
    /// occurrence is summed.
    DuplicateCategory { file_name: String, category: String },
}

/// Outcome of a fold: the summary plus whatever was noticed on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub summary: FacilitySummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Merges validated files against a fixed category set and data window.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    categories: &'a CategorySet,
    window: RowWindow,
}

impl<'a> Aggregator<'a> {
    pub fn new(categories: &'a CategorySet, window: RowWindow) -> Self {
        Self { categories, window }
    }

    /// Zero-seeded fold over every file. An empty slice yields an all-zero
    /// summary.
    pub fn aggregate(&self, files: &[ValidatedFile]) -> Aggregation {
        let mut aggregation = Aggregation {
            summary: FacilitySummary::zeroed(self.categories),
            diagnostics: Vec::new(),
        };
        for file in files {
            self.fold_file(file, &mut aggregation);
        }
        aggregation
    }

    /// Folds one file into an existing aggregation.
    pub fn fold_file(&self, file: &ValidatedFile, into: &mut Aggregation) {
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        let mut folded = 0usize;

        for row in &file.rows {
            let outside = row.sheet_row.filter(|sheet_row| !self.window.contains(*sheet_row));
            if let Some(sheet_row) = outside {
                if has_counts(row) {
                    warn!(
                        file = %file.file_name,
                        sheet_row,
                        category = %row.category,
                        "row outside data window ignored"
                    );
                    into.diagnostics.push(Diagnostic::OutsideWindow {
                        file_name: file.file_name.clone(),
                        sheet_row,
                        category: row.category.clone(),
                    });
                }
                continue;
            }

            let Some(position) = self.categories.position(&row.category) else {
                warn!(
                    file = %file.file_name,
                    sheet_row = ?row.sheet_row,
                    category = %row.category,
                    "unknown category skipped"
                );
                into.diagnostics.push(Diagnostic::UnknownCategory {
                    file_name: file.file_name.clone(),
                    sheet_row: row.sheet_row,
                    category: row.category.clone(),
                });
                continue;
            };

            if !seen.insert(position) {
                warn!(
                    file = %file.file_name,
                    category = %row.category,
                    "category appears more than once, summing all rows"
                );
                into.diagnostics.push(Diagnostic::DuplicateCategory {
                    file_name: file.file_name.clone(),
                    category: row.category.clone(),
                });
            }

            into.summary.add_at(position, &Bucket::from(row));
            folded += 1;
        }

        debug!(file = %file.file_name, folded, "file folded into summary");
    }
}

fn has_counts(row: &ValidatedRow) -> bool {
    !Bucket::from(row).is_zero()
}
