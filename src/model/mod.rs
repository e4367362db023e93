use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Number of facility categories every report is built around.
pub const CATEGORY_COUNT: usize = 10;

/// Canonical facility categories, in report order.
pub const DEFAULT_CATEGORIES: [&str; CATEGORY_COUNT] = [
    "Health-care enterprises",
    "Educational institutions",
    "Social-care units",
    "Universities",
    "Workplaces",
    "Culture and leisure venues",
    "Gastronomy and entertainment venues",
    "Traveler-service facilities",
    "Sports-facility rooms",
    "Other public-use rooms",
];

/// The fixed, ordered set of canonical category labels.
///
/// Built once from configuration and shared by reference; it is never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    /// Validates the labels: exactly [`CATEGORY_COUNT`] unique, non-empty
    /// entries after trimming.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.into().trim().to_string())
            .collect();

        if labels.len() != CATEGORY_COUNT {
            return Err(ToolError::InvalidConfig(format!(
                "expected {CATEGORY_COUNT} categories, found {}",
                labels.len()
            )));
        }
        if labels.iter().any(String::is_empty) {
            return Err(ToolError::InvalidConfig(
                "category labels must not be empty".into(),
            ));
        }
        let unique: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        if unique.len() != labels.len() {
            return Err(ToolError::InvalidConfig(
                "category labels must be unique".into(),
            ));
        }

        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of the label in report order, matched exactly.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|known| known == label)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES.iter().map(|label| label.to_string()).collect(),
        }
    }
}

/// Value of a single spreadsheet cell as seen by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    String(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(value) => value.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text rendering used for category labels.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::String(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One source record keyed by column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub cells: BTreeMap<String, CellValue>,
    /// 1-indexed row number within the source sheet, when known.
    pub sheet_row: Option<u32>,
}

impl RawRow {
    pub fn new(sheet_row: Option<u32>) -> Self {
        Self {
            cells: BTreeMap::new(),
            sheet_row,
        }
    }

    /// Builder-style helper mostly used when assembling rows by hand.
    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(header.into(), value.into());
        self
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

/// A row that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRow {
    pub category: String,
    pub inspected: u64,
    pub compliant: u64,
    pub smoking_room: u64,
    pub sheet_row: Option<u32>,
}

/// A spreadsheet as read from an upload, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub rows: Vec<RawRow>,
}

/// A spreadsheet whose rows all passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFile {
    pub file_name: String,
    pub rows: Vec<ValidatedRow>,
}

/// Three additive counters kept for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub inspected: u64,
    pub compliant: u64,
    pub with_smoking_room: u64,
}

impl Bucket {
    pub fn new(inspected: u64, compliant: u64, with_smoking_room: u64) -> Self {
        Self {
            inspected,
            compliant,
            with_smoking_room,
        }
    }

    /// Counter-wise addition, saturating at `u64::MAX`.
    pub fn add(&mut self, other: &Bucket) {
        self.inspected = self.inspected.saturating_add(other.inspected);
        self.compliant = self.compliant.saturating_add(other.compliant);
        self.with_smoking_room = self.with_smoking_room.saturating_add(other.with_smoking_room);
    }

    pub fn is_zero(&self) -> bool {
        *self == Bucket::default()
    }
}

impl From<&ValidatedRow> for Bucket {
    fn from(row: &ValidatedRow) -> Self {
        Bucket::new(row.inspected, row.compliant, row.smoking_room)
    }
}

/// Bucket attached to its canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub category: String,
    #[serde(flatten)]
    pub bucket: Bucket,
}

/// Merged counters for every canonical category, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilitySummary {
    entries: Vec<CategoryTally>,
}

impl FacilitySummary {
    /// Summary with a zero bucket for every category.
    pub fn zeroed(categories: &CategorySet) -> Self {
        let entries = categories
            .labels()
            .iter()
            .map(|label| CategoryTally {
                category: label.clone(),
                bucket: Bucket::default(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryTally] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<&Bucket> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| &entry.bucket)
    }

    /// Adds into the bucket at a canonical position.
    pub(crate) fn add_at(&mut self, position: usize, bucket: &Bucket) {
        if let Some(entry) = self.entries.get_mut(position) {
            entry.bucket.add(bucket);
        }
    }

    /// Adds every bucket of `other` into the bucket with the same label.
    ///
    /// Labels unknown to `self` are ignored so the key set never changes.
    pub fn merge(&mut self, other: &FacilitySummary) {
        for theirs in &other.entries {
            if let Some(ours) = self
                .entries
                .iter_mut()
                .find(|entry| entry.category == theirs.category)
            {
                ours.bucket.add(&theirs.bucket);
            }
        }
    }

    /// Sum of all buckets.
    pub fn totals(&self) -> Bucket {
        self.entries.iter().fold(Bucket::default(), |mut acc, entry| {
            acc.add(&entry.bucket);
            acc
        })
    }
}
