// src/upload.rs - Local side of an upload
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a local file cannot be uploaded. Checked before any network call.
#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Not a regular file: {0}")]
    NotAFile(String),
    #[error("File is empty: {0}")]
    Empty(String),
    #[error("Cannot read file {0}: {1}")]
    Unreadable(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub remote_name: String,
    pub print_after_upload: bool,
}

impl UploadRequest {
    /// Remote name defaults to the local base name; only a case-insensitive
    /// `"true"` turns on print-after-upload.
    pub fn new(file_path: &str, remote_name: Option<&str>, print_flag: Option<&str>) -> Self {
        let local_path = PathBuf::from(file_path);
        let remote_name = match remote_name {
            Some(name) => name.to_string(),
            None => base_name(&local_path).unwrap_or_else(|| file_path.to_string()),
        };
        Self {
            local_path,
            remote_name,
            print_after_upload: print_flag.is_some_and(|flag| flag.eq_ignore_ascii_case("true")),
        }
    }

    /// Check the local file and return its size in bytes.
    pub async fn validate(&self) -> Result<u64, UploadError> {
        let display = self.local_path.display().to_string();
        let metadata = match tokio::fs::metadata(&self.local_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UploadError::NotFound(display));
            }
            Err(e) => return Err(UploadError::Unreadable(display, e.to_string())),
        };
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(display));
        }
        if metadata.len() == 0 {
            return Err(UploadError::Empty(display));
        }
        if let Err(e) = tokio::fs::File::open(&self.local_path).await {
            return Err(UploadError::Unreadable(display, e.to_string()));
        }
        Ok(metadata.len())
    }
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
