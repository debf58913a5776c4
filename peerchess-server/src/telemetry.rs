use crate::error::ServerError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "peerchess_server=debug,axum::rejection=trace,warn";

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing(json: bool) -> Result<(), ServerError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = Registry::default().with(env_filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_ansi(true))
            .try_init()
    };

    result.map_err(|e| ServerError::Telemetry(e.to_string()))
}
