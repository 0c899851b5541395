//! Command handlers. Each one is a fixed sequence of device calls.
//!
//! Expected refusals (bad status codes, missing files, wrong job state) come
//! back as `Ok` failure envelopes. An `Err` means a request produced no usable
//! response and is left for the dispatcher to report.

use std::time::Instant;

use serde_json::{Value, json};

use crate::envelope::Envelope;
use crate::job_state::JobState;
use crate::printer::{PrinterApi, PrinterError};
use crate::upload::UploadRequest;

fn connect_failure(status: u16) -> Envelope {
    Envelope::failure(format!("Failed to connect to printer: {}", status))
}

/// Version, printer and job reports bundled together.
pub async fn status(printer: &dyn PrinterApi) -> Result<Envelope, PrinterError> {
    let version = printer.get_version().await?;
    if !version.is_ok() {
        return Ok(connect_failure(version.status));
    }
    let version: Value = version.json()?;

    let printer_data = printer.get_printer().await?.json_if_ok()?;
    let job_data = printer.get_job().await?.json_if_ok()?;

    Ok(Envelope::success("Printer status retrieved").with_data(json!({
        "version": version,
        "printer": printer_data,
        "job": job_data,
        "connected": true,
    })))
}

/// Upload a local file, replacing any remote file of the same name.
pub async fn upload(
    printer: &dyn PrinterApi,
    request: &UploadRequest,
) -> Result<Envelope, PrinterError> {
    let size = match request.validate().await {
        Ok(size) => size,
        Err(e) => return Ok(Envelope::failure(e.to_string())),
    };
    tracing::info!(
        "Uploading file: {} ({:.2} MB)",
        request.local_path.display(),
        size as f64 / 1024.0 / 1024.0
    );

    let version = printer.get_version().await?;
    if !version.is_ok() {
        return Ok(connect_failure(version.status));
    }

    if printer.file_exists(&request.remote_name).await? {
        tracing::info!("Deleting existing file: {}", request.remote_name);
        match printer.delete_file(&request.remote_name).await {
            Ok(response) if response.status >= 400 => {
                tracing::warn!("Failed to delete existing file: {}", response.status);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to delete existing file: {}", e),
        }
    }

    tracing::info!("Starting file upload...");
    let started = Instant::now();
    let response = printer
        .upload_file(&request.local_path, &request.remote_name, request.print_after_upload)
        .await?;
    let upload_time = started.elapsed().as_secs_f64();
    tracing::info!("Upload completed in {:.2} seconds", upload_time);

    if response.status >= 400 {
        let text = response.text();
        let error = if text.trim().is_empty() { "Unknown error".to_string() } else { text };
        return Ok(Envelope::failure(format!("Upload failed with status code: {}", response.status))
            .with_error(error));
    }

    let message = if request.print_after_upload {
        "File uploaded successfully and print started"
    } else {
        "File uploaded successfully"
    };
    Ok(Envelope::success(message).with_data(json!({
        "filename": request.remote_name,
        "upload_time": upload_time,
        "print_started": request.print_after_upload,
    })))
}

/// Start printing a file already stored on the device.
pub async fn start_print(
    printer: &dyn PrinterApi,
    file_name: &str,
) -> Result<Envelope, PrinterError> {
    let response = printer.select_file(file_name).await?;
    if response.status >= 300 {
        return Ok(Envelope::failure(format!("Failed to start print: {}", response.status)));
    }
    Ok(Envelope::success("Print started successfully").with_data(json!({ "filename": file_name })))
}

/// Cancel the current job, but only while it is actively printing.
pub async fn stop_print(printer: &dyn PrinterApi) -> Result<Envelope, PrinterError> {
    let job = printer.get_job().await?;
    if !job.is_ok() {
        return Ok(Envelope::failure(format!("Failed to get job status: {}", job.status)));
    }
    let state = JobState::from_job(&job.json()?);
    if !state.can_cancel() {
        tracing::info!("Refusing to cancel, job state is {:?}", state);
        return Ok(Envelope::failure("No active print job to cancel"));
    }

    let response = printer.cancel_job().await?;
    if response.status >= 300 {
        return Ok(Envelope::failure(format!("Failed to cancel print job: {}", response.status)));
    }
    Ok(Envelope::success("Print job canceled successfully"))
}

/// Check connectivity. `success` is exactly "the version read returned OK".
pub async fn test_connection(printer: &dyn PrinterApi) -> Result<Envelope, PrinterError> {
    let version = printer.get_version().await?;
    if !version.is_ok() {
        let mut envelope = Envelope::failure(format!("Failed to connect: {}", version.status));
        envelope.data = Some(json!({ "version": null, "printer": null }));
        return Ok(envelope);
    }
    let version: Value = version.json()?;

    let printer_data = match printer.get_printer().await {
        Ok(response) => response.json_if_ok().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable printer report: {}", e);
            None
        }),
        Err(e) => {
            tracing::warn!("Printer report unavailable: {}", e);
            None
        }
    };

    Ok(Envelope::success("Connection successful").with_data(json!({
        "version": version,
        "printer": printer_data,
    })))
}
