use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::aggregate::{Aggregator, Diagnostic};
use crate::config::ReportConfig;
use crate::error::{Result, ToolError};
use crate::io::excel_read::read_source_file;
use crate::io::upload::Upload;
use crate::model::{FacilitySummary, ValidatedFile};
use crate::validate::{ColumnSchema, validate_file};

/// A file that was dropped from the batch, with the reason.
#[derive(Debug)]
pub struct FileRejection {
    pub file_name: String,
    pub error: ToolError,
}

/// Result of reconciling a batch of uploads.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub summary: FacilitySummary,
    pub diagnostics: Vec<Diagnostic>,
    pub accepted: Vec<String>,
    #[serde(skip)]
    pub rejected: Vec<FileRejection>,
}

/// Gate, read and validate one upload.
#[instrument(level = "info", skip_all, fields(file = %upload.file_name))]
pub fn process_upload(
    upload: &Upload,
    config: &ReportConfig,
    schema: &ColumnSchema,
) -> Result<ValidatedFile> {
    let source = read_source_file(upload, config, schema)?;
    let validated = validate_file(&source, schema)?;
    info!(row_count = validated.rows.len(), "file accepted");
    Ok(validated)
}

/// Processes every upload independently and merges the survivors.
///
/// A rejected file never stops the others. The batch fails only when the
/// configuration is invalid or no file survives.
#[instrument(level = "info", skip_all, fields(file_count = uploads.len()))]
pub fn summarize(uploads: &[Upload], config: &ReportConfig) -> Result<BatchReport> {
    config.check()?;
    let categories = config.category_set()?;
    let schema = config.column_schema()?;

    let outcomes: Vec<Result<ValidatedFile>> = uploads
        .par_iter()
        .map(|upload| process_upload(upload, config, &schema))
        .collect();

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (upload, outcome) in uploads.iter().zip(outcomes) {
        match outcome {
            Ok(file) => accepted.push(file),
            Err(cause) => {
                error!(file = %upload.file_name, %cause, "file rejected");
                rejected.push(FileRejection {
                    file_name: upload.file_name.clone(),
                    error: cause,
                });
            }
        }
    }

    if accepted.is_empty() {
        return Err(ToolError::NoValidFiles);
    }

    let aggregation = Aggregator::new(&categories, config.window).aggregate(&accepted);
    info!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        diagnostics = aggregation.diagnostics.len(),
        "batch aggregated"
    );

    Ok(BatchReport {
        summary: aggregation.summary,
        diagnostics: aggregation.diagnostics,
        accepted: accepted.into_iter().map(|file| file.file_name).collect(),
        rejected,
    })
}
