//! Drive a PrusaLink printer's local REST service one command at a time,
//! reporting a single JSON result envelope per invocation.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod job_state;
pub mod logging;
pub mod printer;
pub mod prusalink;
pub mod upload;

pub use dispatcher::{Command, Invocation, Outcome};
pub use envelope::Envelope;
pub use job_state::JobState;
pub use printer::{ApiResponse, PrinterApi, PrinterError};
pub use prusalink::{PrusaLinkClient, SessionConfig};
pub use upload::UploadRequest;
