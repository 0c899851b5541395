//! Maps a command token to its handler and turns every outcome, including
//! unexpected errors and panics, into exactly one envelope and an exit code.

use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;

use crate::commands;
use crate::config::ConfigError;
use crate::envelope::Envelope;
use crate::printer::{PrinterApi, PrinterError};
use crate::prusalink::SessionConfig;
use crate::upload::UploadRequest;

pub const USAGE: &str =
    "Not enough arguments. Usage: prusalink-bridge <command> <ip> <api_key> [args...]";

/// Failures nobody predicted locally; reported with a full cause chain.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Printer request failed: {0}")]
    Printer(#[from] PrinterError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Command panicked: {0}")]
    Panic(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Upload(UploadRequest),
    Print { file_name: String },
    Stop,
    Connect,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Upload(_) => "upload",
            Command::Print { .. } => "print",
            Command::Stop => "stop",
            Command::Connect => "connect",
        }
    }

    /// `connect` reports connectivity inside the envelope and always exits 0.
    pub fn exit_code(&self, envelope: &Envelope) -> u8 {
        match self {
            Command::Connect => 0,
            _ => exit_code_for(envelope),
        }
    }
}

fn exit_code_for(envelope: &Envelope) -> u8 {
    if envelope.success { 0 } else { 1 }
}

/// A validated command line: command, target printer, credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub address: String,
    pub api_key: String,
}

impl Invocation {
    /// Validate arity and build the command. Nothing here touches the network.
    pub fn parse(args: &[String]) -> Result<Self, Envelope> {
        let [command, address, api_key, extra @ ..] = args else {
            return Err(Envelope::failure(USAGE));
        };
        let command = match command.as_str() {
            "status" => Command::Status,
            "upload" => {
                let Some(file_path) = extra.first() else {
                    return Err(Envelope::failure("File path is required for upload command"));
                };
                Command::Upload(UploadRequest::new(
                    file_path,
                    extra.get(1).map(String::as_str),
                    extra.get(2).map(String::as_str),
                ))
            }
            "print" => {
                let Some(file_name) = extra.first() else {
                    return Err(Envelope::failure("File name is required for print command"));
                };
                Command::Print { file_name: file_name.clone() }
            }
            "stop" => Command::Stop,
            "connect" => Command::Connect,
            other => return Err(Envelope::failure(format!("Unknown command: {}", other))),
        };
        Ok(Self {
            command,
            address: address.clone(),
            api_key: api_key.clone(),
        })
    }

    pub fn session_config(&self, timeout: Duration) -> SessionConfig {
        SessionConfig {
            address: self.address.clone(),
            api_key: self.api_key.clone(),
            timeout,
        }
    }
}

/// The single envelope of an invocation and the process exit code.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub envelope: Envelope,
    pub exit_code: u8,
}

impl Outcome {
    pub fn failed(envelope: Envelope) -> Self {
        Self { envelope, exit_code: 1 }
    }
}

/// Run one command line end to end. `connect` builds the session and is only
/// called once the arguments are valid.
pub async fn run<P, F>(args: &[String], timeout: Duration, connect: F) -> Outcome
where
    P: PrinterApi,
    F: FnOnce(&SessionConfig) -> Result<P, PrinterError>,
{
    let invocation = match Invocation::parse(args) {
        Ok(invocation) => invocation,
        Err(envelope) => {
            tracing::warn!("Rejected command line: {}", envelope.message);
            return Outcome::failed(envelope);
        }
    };
    tracing::debug!("Running '{}' against {}", invocation.command.name(), invocation.address);

    let result = AssertUnwindSafe(execute(&invocation, timeout, connect))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(BridgeError::Panic(panic_message(payload.as_ref()))));

    match result {
        Ok(envelope) => Outcome {
            exit_code: invocation.command.exit_code(&envelope),
            envelope,
        },
        Err(e) => Outcome::failed(failure_envelope(&e)),
    }
}

async fn execute<P, F>(
    invocation: &Invocation,
    timeout: Duration,
    connect: F,
) -> Result<Envelope, BridgeError>
where
    P: PrinterApi,
    F: FnOnce(&SessionConfig) -> Result<P, PrinterError>,
{
    let printer = connect(&invocation.session_config(timeout))?;
    let envelope = dispatch(&invocation.command, &printer).await?;
    Ok(envelope)
}

/// Invoke the handler for an already validated command.
pub async fn dispatch(
    command: &Command,
    printer: &dyn PrinterApi,
) -> Result<Envelope, PrinterError> {
    match command {
        Command::Status => commands::status(printer).await,
        Command::Upload(request) => commands::upload(printer, request).await,
        Command::Print { file_name } => commands::start_print(printer, file_name).await,
        Command::Stop => commands::stop_print(printer).await,
        Command::Connect => commands::test_connection(printer).await,
    }
}

/// Convert an unexpected error into a failure envelope carrying its cause chain.
pub fn failure_envelope(error: &BridgeError) -> Envelope {
    tracing::error!("{}", error);
    let text = error.to_string();
    Envelope::failure(text.clone())
        .with_error(text)
        .with_traceback(cause_chain(error))
}

fn cause_chain(error: &dyn StdError) -> String {
    let mut lines = vec![format!("Error: {}", error)];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    lines.push(format!("Debug: {:?}", error));
    lines.join("\n")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
