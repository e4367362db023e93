use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ToolError};
use crate::model::{CategorySet, DEFAULT_CATEGORIES};
use crate::validate::{ColumnRule, ColumnSchema};

/// Upper bound on the size of a single upload, in bytes.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// 1-indexed row holding the column headers of a source sheet.
pub const DEFAULT_HEADER_ROW: u32 = 5;

/// Inclusive 1-indexed range of sheet rows that carry category data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RowWindow {
    pub first: u32,
    pub last: u32,
}

impl RowWindow {
    pub fn contains(&self, sheet_row: u32) -> bool {
        (self.first..=self.last).contains(&sheet_row)
    }
}

impl Default for RowWindow {
    fn default() -> Self {
        Self { first: 6, last: 15 }
    }
}

/// Where the header sits in a source sheet and how footer rows are recognised.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub header_row: u32,
    /// Lower-case fragments that mark a totals row in the category column.
    pub total_markers: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            total_markers: vec!["razem".into(), "total".into(), "suma".into()],
        }
    }
}

/// Limits enforced before a file is opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: vec!["xlsx".into()],
        }
    }
}

/// Everything the reconciliation pipeline needs to know about its inputs.
///
/// All fields fall back to the built-in schema, so a JSON file only has to
/// list what differs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub categories: Vec<String>,
    pub columns: Vec<ColumnRule>,
    pub sheet: SheetLayout,
    pub window: RowWindow,
    pub upload: UploadLimits,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|label| label.to_string()).collect(),
            columns: ColumnSchema::default().into_rules(),
            sheet: SheetLayout::default(),
            window: RowWindow::default(),
            upload: UploadLimits::default(),
        }
    }
}

impl ReportConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&data)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects layouts the reader and aggregator cannot work with.
    pub fn check(&self) -> Result<()> {
        self.category_set()?;
        self.column_schema()?;
        if self.window.first > self.window.last {
            return Err(ToolError::InvalidConfig(format!(
                "row window {}..={} is empty",
                self.window.first, self.window.last
            )));
        }
        if self.sheet.header_row == 0 || self.window.first <= self.sheet.header_row {
            return Err(ToolError::InvalidConfig(format!(
                "header row {} must precede the data window starting at {}",
                self.sheet.header_row, self.window.first
            )));
        }
        Ok(())
    }

    pub fn category_set(&self) -> Result<CategorySet> {
        CategorySet::new(self.categories.iter().cloned())
    }

    pub fn column_schema(&self) -> Result<ColumnSchema> {
        ColumnSchema::new(self.columns.clone())
    }
}
