//! Diagnostics go to stderr; stdout is reserved for the result line.

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

/// Plain fmt subscriber writing to `writer`, without installing it.
pub fn subscriber<W>(level: Level, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_target(false)
        .finish()
}

/// Install the process-wide stderr subscriber.
pub fn init(level: Level) {
    if tracing::subscriber::set_global_default(subscriber(level, std::io::stderr)).is_err() {
        tracing::debug!("Logging already initialized");
    }
}
