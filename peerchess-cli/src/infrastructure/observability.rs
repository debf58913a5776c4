use crate::infrastructure::CliError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
///
/// Logs go to stderr so stdout stays free for the board and game messages.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub default_level: tracing::Level,
    pub json_format: bool,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    /// Whether to emit logs at all
    pub show_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: tracing::Level::INFO,
            json_format: false,
            show_thread_ids: false,
            show_targets: true,
            show_logs: true,
        }
    }
}

impl LogConfig {
    /// Development configuration (verbose, human-readable)
    pub fn dev() -> Self {
        Self {
            default_level: tracing::Level::DEBUG,
            show_thread_ids: true,
            ..Default::default()
        }
    }

    /// Only warnings and errors
    pub fn quiet() -> Self {
        Self {
            default_level: tracing::Level::WARN,
            ..Default::default()
        }
    }

    pub fn with_json(mut self) -> Self {
        self.json_format = true;
        self
    }

    pub fn without_logs(mut self) -> Self {
        self.show_logs = false;
        self
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> String {
        let level = self.default_level;
        format!(
            "peerchess_cli={level},peerchess_p2p={level},peerchess_core={level},matchbox_socket=warn"
        )
    }

    pub fn init(self) -> Result<(), CliError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directives()));

        let registry = tracing_subscriber::registry().with(env_filter);

        let result = if !self.show_logs {
            registry.try_init()
        } else if self.json_format {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(self.show_targets)
                        .with_thread_ids(self.show_thread_ids),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(self.show_targets)
                        .with_thread_ids(self.show_thread_ids),
                )
                .try_init()
        };

        result.map_err(|e| CliError::Logging(e.to_string()))
    }
}
