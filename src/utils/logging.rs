//! Logging utilities
//!
//! Provides logging setup and the optional echo of control channel traffic.

use env_logger::Env;
use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Setup logging for the client, `RUST_LOG` overrides the default `warn` filter.
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
}

/// Echoes every command sent and every reply line received to a sink.
///
/// Sent lines are prefixed with `> ` and received lines with `< `.
/// Echo failures are logged and otherwise ignored.
#[derive(Default)]
pub struct ProtocolEcho {
    sink: Option<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl ProtocolEcho {
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn stdout() -> Self {
        Self::to_sink(tokio::io::stdout())
    }

    pub fn to_sink(sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// Echoes to stdout when `verbose` is set, otherwise does nothing.
    pub fn verbose(verbose: bool) -> Self {
        if verbose {
            Self::stdout()
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub async fn sent(&mut self, line: &str) {
        self.echo("> ", line).await;
    }

    pub async fn received(&mut self, line: &str) {
        self.echo("< ", line).await;
    }

    async fn echo(&mut self, prefix: &str, line: &str) {
        if let Some(sink) = self.sink.as_mut() {
            let text = format!("{prefix}{line}\n");
            let written = match sink.write_all(text.as_bytes()).await {
                Ok(()) => sink.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                warn!("Failed to echo protocol line: {e}");
            }
        }
    }
}

impl std::fmt::Debug for ProtocolEcho {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolEcho")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
