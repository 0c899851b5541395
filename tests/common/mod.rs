//! In-memory stand-in for a PrusaLink printer that records every call.
#![allow(dead_code)]

use async_trait::async_trait;
use prusalink_bridge::{ApiResponse, PrinterApi, PrinterError};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetVersion,
    GetPrinter,
    GetJob,
    FileExists(String),
    DeleteFile(String),
    UploadFile { remote_name: String, print_after_upload: bool },
    SelectFile(String),
    CancelJob,
}

/// `None` stands for a transport failure on that call.
pub struct FakePrinter {
    pub version: Option<ApiResponse>,
    pub printer: Option<ApiResponse>,
    pub job: Option<ApiResponse>,
    pub exists: bool,
    pub delete: Option<ApiResponse>,
    pub upload: Option<ApiResponse>,
    pub select: Option<ApiResponse>,
    pub cancel: Option<ApiResponse>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakePrinter {
    /// A reachable idle printer where every operation succeeds.
    pub fn healthy() -> Self {
        Self {
            version: Some(ApiResponse::json_body(
                200,
                &json!({ "api": "2.0.0", "server": "2.1.2" }),
            )),
            printer: Some(ApiResponse::json_body(
                200,
                &json!({ "state": { "text": "Operational" } }),
            )),
            job: Some(job_response("Operational")),
            exists: false,
            delete: Some(ApiResponse::new(204, "")),
            upload: Some(ApiResponse::new(201, "")),
            select: Some(ApiResponse::new(204, "")),
            cancel: Some(ApiResponse::new(204, "")),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_job_state(mut self, state: &str) -> Self {
        self.job = Some(job_response(state));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Handle to the call log that outlives the printer once it is moved.
    pub fn call_log(&self) -> Arc<Mutex<Vec<Call>>> {
        self.calls.clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn reply(response: &Option<ApiResponse>) -> Result<ApiResponse, PrinterError> {
        response
            .clone()
            .ok_or_else(|| {
                let refused = std::io::ErrorKind::ConnectionRefused;
                PrinterError::Io(std::io::Error::new(refused, "connection refused"))
            })
    }
}

pub fn job_response(state: &str) -> ApiResponse {
    let job = json!({ "state": state, "job": { "file": { "name": "movie.gcode" } } });
    ApiResponse::json_body(200, &job)
}

#[async_trait]
impl PrinterApi for FakePrinter {
    async fn get_version(&self) -> Result<ApiResponse, PrinterError> {
        self.record(Call::GetVersion);
        Self::reply(&self.version)
    }

    async fn get_printer(&self) -> Result<ApiResponse, PrinterError> {
        self.record(Call::GetPrinter);
        Self::reply(&self.printer)
    }

    async fn get_job(&self) -> Result<ApiResponse, PrinterError> {
        self.record(Call::GetJob);
        Self::reply(&self.job)
    }

    async fn file_exists(&self, remote_name: &str) -> Result<bool, PrinterError> {
        self.record(Call::FileExists(remote_name.to_string()));
        Ok(self.exists)
    }

    async fn delete_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError> {
        self.record(Call::DeleteFile(remote_name.to_string()));
        Self::reply(&self.delete)
    }

    async fn upload_file(
        &self,
        _local_path: &Path,
        remote_name: &str,
        print_after_upload: bool,
    ) -> Result<ApiResponse, PrinterError> {
        self.record(Call::UploadFile {
            remote_name: remote_name.to_string(),
            print_after_upload,
        });
        Self::reply(&self.upload)
    }

    async fn select_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError> {
        self.record(Call::SelectFile(remote_name.to_string()));
        Self::reply(&self.select)
    }

    async fn cancel_job(&self) -> Result<ApiResponse, PrinterError> {
        self.record(Call::CancelJob);
        Self::reply(&self.cancel)
    }
}
