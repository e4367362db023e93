use std::path::Path;

use crate::config::UploadLimits;
use crate::error::{Result, ToolError};

/// Raw bytes of a submitted spreadsheet together with its original name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Loads a file fully into memory.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Checks extension and size before the workbook is opened.
pub fn check_upload(upload: &Upload, limits: &UploadLimits) -> Result<()> {
    let extension = Path::new(&upload.file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    let accepted = extension.is_some_and(|ext| {
        limits
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    });
    if !accepted {
        return Err(ToolError::FileType {
            file_name: upload.file_name.clone(),
            expected: limits.allowed_extensions.join(", "),
        });
    }

    if upload.bytes.len() > limits.max_file_size {
        return Err(ToolError::FileSize {
            file_name: upload.file_name.clone(),
            size: upload.bytes.len(),
            limit: limits.max_file_size,
        });
    }

    Ok(())
}
