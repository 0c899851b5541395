//! HTTP client for a PrusaLink printer's local REST service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::printer::{ApiResponse, PrinterApi, PrinterError};

const API_KEY_HEADER: &str = "X-Api-Key";
const STORAGE_PREFIX: [&str; 4] = ["api", "v1", "files", "usb"];

/// Connection parameters for one session. Immutable once built.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `host`, `host:port` or a full `http(s)://` URL.
    pub address: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Build a client for the given session. The timeout must already be
/// sanitized, see [`crate::config::sanitize_timeout`].
pub fn connect(config: &SessionConfig) -> Result<PrusaLinkClient, PrinterError> {
    let base_url = parse_address(&config.address)?;
    // Deadlines apply to each connect and read, not to the whole transfer.
    let client = Client::builder()
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout)
        .build()?;
    tracing::debug!("PrusaLink session for {} (timeout {:?})", base_url, config.timeout);
    Ok(PrusaLinkClient {
        client,
        base_url,
        api_key: config.api_key.clone(),
    })
}

fn parse_address(address: &str) -> Result<Url, PrinterError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(PrinterError::InvalidAddress("empty address".to_string()));
    }
    let candidate = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };
    let url = Url::parse(&candidate)
        .map_err(|e| PrinterError::InvalidAddress(format!("{}: {}", address, e)))?;
    if url.host_str().is_none() {
        return Err(PrinterError::InvalidAddress(address.to_string()));
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct PrusaLinkClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl PrusaLinkClient {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, PrinterError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PrinterError::InvalidAddress(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Storage URL for a remote file; `/` in the name selects subfolders.
    fn file_endpoint(&self, remote_name: &str) -> Result<Url, PrinterError> {
        let name_segments = remote_name.split('/').filter(|s| !s.is_empty());
        self.endpoint(STORAGE_PREFIX.into_iter().chain(name_segments))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn send(request: RequestBuilder) -> Result<ApiResponse, PrinterError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::debug!("-> {} ({} bytes)", status, body.len());
        Ok(ApiResponse::new(status, body))
    }

    async fn get(&self, segments: [&str; 2]) -> Result<ApiResponse, PrinterError> {
        let url = self.endpoint(segments)?;
        Self::send(self.request(Method::GET, url)).await
    }
}

#[async_trait]
impl PrinterApi for PrusaLinkClient {
    async fn get_version(&self) -> Result<ApiResponse, PrinterError> {
        self.get(["api", "version"]).await
    }

    async fn get_printer(&self) -> Result<ApiResponse, PrinterError> {
        self.get(["api", "printer"]).await
    }

    async fn get_job(&self) -> Result<ApiResponse, PrinterError> {
        self.get(["api", "job"]).await
    }

    async fn file_exists(&self, remote_name: &str) -> Result<bool, PrinterError> {
        let url = self.file_endpoint(remote_name)?;
        let response = Self::send(self.request(Method::HEAD, url)).await?;
        Ok(response.is_ok())
    }

    async fn delete_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError> {
        let url = self.file_endpoint(remote_name)?;
        Self::send(self.request(Method::DELETE, url)).await
    }

    async fn upload_file(
        &self,
        local_path: &Path,
        remote_name: &str,
        print_after_upload: bool,
    ) -> Result<ApiResponse, PrinterError> {
        let url = self.file_endpoint(remote_name)?;
        let file = tokio::fs::File::open(local_path).await?;
        let size = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let request = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, size)
            .header("Print-After-Upload", if print_after_upload { "?1" } else { "?0" })
            .header("Overwrite", "?0")
            .body(body);
        Self::send(request).await
    }

    async fn select_file(&self, remote_name: &str) -> Result<ApiResponse, PrinterError> {
        let url = self.file_endpoint(remote_name)?;
        Self::send(self.request(Method::POST, url)).await
    }

    async fn cancel_job(&self) -> Result<ApiResponse, PrinterError> {
        let url = self.endpoint(["api", "job"])?;
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "command": "cancel" }));
        Self::send(request).await
    }
}
