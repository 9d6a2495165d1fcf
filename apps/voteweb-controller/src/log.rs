//! Logging for the voteweb controller.
//!
//! Uses the `tracing` library. After calling [`setup`], log messages go to
//! `stderr`, leaving `stdout` to the verification result.
//!
//! You may use the `RUST_LOG` environment variable to configure logging at
//! runtime (see [`EnvFilter`][`tracing_subscriber::EnvFilter`]).

use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

use crate::config::Config;

/// Sets up logging for the application. Call this early in the process
/// lifecycle to ensure logs are not silently ignored.
pub fn setup(config: &Config) -> color_eyre::Result<()> {
    color_eyre::install()?;
    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    format!(
                        "{}={}",
                        env!("CARGO_PKG_NAME").replace('-', "_"),
                        config.log_level
                    )
                    .parse()?,
                )
                .from_env_lossy(),
        )
        .with(stderr_log)
        .init();
    Ok(())
}
