// src/printer.rs - Device operations the command handlers rely on
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A request that never produced a usable HTTP response.
#[derive(Debug, Error)]
pub enum PrinterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid printer address: {0}")]
    InvalidAddress(String),
}

/// Status code plus raw body of one device response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a response carrying a JSON body.
    pub fn json_body(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// True only for `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, PrinterError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decoded body for a `200 OK` response, `None` for anything else.
    pub fn json_if_ok(&self) -> Result<Option<Value>, PrinterError> {
        if self.is_ok() {
            Ok(Some(self.json()?))
        } else {
            Ok(None)
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One outbound request per call, no retries. Upload, delete, select and
/// cancel change device state.
#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn get_version(&self) -> Result<ApiResponse, PrinterError>;
    async fn get_printer(&self) -> Result<ApiResponse, PrinterError>;
    async fn get_job(&self) -> Result<ApiResponse, PrinterError>;
    async fn file_exists(&self, remote_name: &str) -> Result<bool, PrinterError>;
    async fn delete_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError>;
    async fn upload_file(
        &self,
        local_path: &Path,
        remote_name: &str,
        print_after_upload: bool,
    ) -> Result<ApiResponse, PrinterError>;
    async fn select_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError>;
    async fn cancel_job(&self) -> Result<ApiResponse, PrinterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_if_ok_skips_non_ok() {
        let ok = ApiResponse::json_body(200, &json!({ "api": "2.0.0" }));
        assert_eq!(ok.json_if_ok().unwrap(), Some(json!({ "api": "2.0.0" })));
        let denied = ApiResponse::new(401, "Unauthorized");
        assert_eq!(denied.json_if_ok().unwrap(), None);
        assert_eq!(denied.text(), "Unauthorized");
    }

    #[test]
    fn test_malformed_ok_body_is_an_error() {
        let broken = ApiResponse::new(200, "<html>");
        assert!(matches!(broken.json_if_ok(), Err(PrinterError::Decode(_))));
    }

    #[test]
    fn test_only_200_is_ok() {
        assert!(ApiResponse::new(200, "").is_ok());
        assert!(!ApiResponse::new(204, "").is_ok());
        assert!(!ApiResponse::new(500, "").is_ok());
    }
}
