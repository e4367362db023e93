//! Structural validation of raw spreadsheet rows.
//!
//! Source files drift: the same counter has been exported under different
//! headers over the years and numeric cells arrive as numbers, text, or
//! nothing at all. Validation is therefore strict only about the category
//! label and permissive about everything numeric.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RowError, ToolError};
use crate::model::{CellValue, RawRow, SourceFile, ValidatedFile, ValidatedRow};

/// Canonical fields extracted from a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Category,
    Inspected,
    Compliant,
    SmokingRoom,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Category,
        Field::Inspected,
        Field::Compliant,
        Field::SmokingRoom,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Category => write!(f, "category"),
            Field::Inspected => write!(f, "inspected"),
            Field::Compliant => write!(f, "compliant"),
            Field::SmokingRoom => write!(f, "smoking_room"),
        }
    }
}

/// Accepted source headers for one field, most recent name first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub field: Field,
    pub headers: Vec<String>,
}

impl ColumnRule {
    pub fn new(field: Field, headers: &[&str]) -> Self {
        Self {
            field,
            headers: headers.iter().map(|header| header.to_string()).collect(),
        }
    }
}

/// Ordered header lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    rules: Vec<ColumnRule>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            rules: vec![
                ColumnRule::new(Field::Category, &["Category"]),
                ColumnRule::new(Field::Inspected, &["Inspected"]),
                ColumnRule::new(Field::Compliant, &["Compliant", "Meeting requirements"]),
                ColumnRule::new(Field::SmokingRoom, &["With smoking room", "Smoking rooms"]),
            ],
        }
    }
}

impl ColumnSchema {
    /// Requires exactly one rule with at least one header for every field.
    pub fn new(rules: Vec<ColumnRule>) -> Result<Self> {
        for field in Field::ALL {
            let matching: Vec<&ColumnRule> =
                rules.iter().filter(|rule| rule.field == field).collect();
            match matching.as_slice() {
                [rule] if rule.headers.iter().any(|h| !h.trim().is_empty()) => {}
                [] => {
                    return Err(ToolError::InvalidConfig(format!(
                        "no column rule for field '{field}'"
                    )));
                }
                [_] => {
                    return Err(ToolError::InvalidConfig(format!(
                        "column rule for field '{field}' lists no headers"
                    )));
                }
                _ => {
                    return Err(ToolError::InvalidConfig(format!(
                        "field '{field}' has more than one column rule"
                    )));
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn headers(&self, field: Field) -> &[String] {
        self.rules
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| rule.headers.as_slice())
            .unwrap_or_default()
    }

    /// First header of `field` whose cell is present and non-empty.
    ///
    /// Later headers are consulted only when earlier ones are absent; values
    /// are never combined.
    pub fn lookup<'a>(&self, row: &'a RawRow, field: Field) -> Option<&'a CellValue> {
        self.headers(field)
            .iter()
            .filter_map(|header| row.get(header))
            .find(|value| !value.is_empty())
    }

    pub fn into_rules(self) -> Vec<ColumnRule> {
        self.rules
    }
}

/// Coerces a cell into a non-negative count.
///
/// Precedence: a number passes through (truncated), a string is trimmed and
/// parsed as a decimal number, anything else is 0. Negative, NaN and
/// infinite values also become 0. Never fails.
pub fn coerce_count(value: Option<&CellValue>) -> u64 {
    let number = match value {
        Some(CellValue::Number(number)) => *number,
        Some(CellValue::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        Some(CellValue::Empty) | None => 0.0,
    };
    if number.is_finite() && number > 0.0 {
        number.trunc() as u64
    } else {
        0
    }
}

/// Validates one row. `position` is the 0-based index of the row in its file
/// and is only used for error reporting when the sheet row is unknown.
pub fn validate_row(
    row: &RawRow,
    position: usize,
    schema: &ColumnSchema,
) -> std::result::Result<ValidatedRow, RowError> {
    let category = schema
        .lookup(row, Field::Category)
        .map(|value| value.to_text().trim().to_string())
        .unwrap_or_default();

    if category.is_empty() {
        return Err(RowError {
            row_index: row.sheet_row.unwrap_or(position as u32 + 1),
            field: Field::Category.to_string(),
            message: "category is required".into(),
        });
    }

    Ok(ValidatedRow {
        category,
        inspected: coerce_count(schema.lookup(row, Field::Inspected)),
        compliant: coerce_count(schema.lookup(row, Field::Compliant)),
        smoking_room: coerce_count(schema.lookup(row, Field::SmokingRoom)),
        sheet_row: row.sheet_row,
    })
}

/// Validates every row, collecting all failures before rejecting.
pub fn validate_rows(rows: &[RawRow], schema: &ColumnSchema) -> Result<Vec<ValidatedRow>> {
    let mut validated = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        match validate_row(row, position, schema) {
            Ok(row) => validated.push(row),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(ToolError::Validation(errors))
    }
}

/// Validates a whole source file.
pub fn validate_file(source: &SourceFile, schema: &ColumnSchema) -> Result<ValidatedFile> {
    let rows = validate_rows(&source.rows, schema)?;
    debug!(file = %source.file_name, row_count = rows.len(), "rows validated");
    Ok(ValidatedFile {
        file_name: source.file_name.clone(),
        rows,
    })
}
