// src/main.rs - One command per process, one JSON line on stdout
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use prusalink_bridge::cli::Cli;
use prusalink_bridge::config::{self, Config};
use prusalink_bridge::dispatcher::{self, BridgeError, Outcome};
use prusalink_bridge::{Envelope, logging, prusalink};
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let outcome = run().await;
    println!("{}", outcome.envelope.to_line());
    ExitCode::from(outcome.exit_code)
}

async fn run() -> Outcome {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let message = e.render().to_string();
            return Outcome::failed(Envelope::failure(message.trim().to_string()));
        }
    };

    let config = match &cli.config {
        Some(path) => {
            // The configured level is unknown until the file loads; report at INFO meanwhile.
            let startup = logging::subscriber(Level::INFO, std::io::stderr);
            let loaded = tracing::subscriber::with_default(startup, || {
                config::load_config(&path.to_string_lossy())
                    .map_err(|e| dispatcher::failure_envelope(&BridgeError::Config(e)))
            });
            match loaded {
                Ok(config) => config,
                Err(envelope) => return Outcome::failed(envelope),
            }
        }
        None => Config::default(),
    };

    logging::init(config.log_level(cli.log_level.as_deref()));
    tracing::debug!("prusalink-bridge {}", env!("CARGO_PKG_VERSION"));

    let timeout = config.timeout(cli.timeout.as_deref());
    dispatcher::run(&cli.args, timeout, prusalink::connect).await
}
