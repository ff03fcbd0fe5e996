//! Tracing setup: stdout plus the error and usage log files.

use std::fs;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Target of the per-request usage log.
pub const USAGE_TARGET: &str = "opss::usage";

const DEFAULT_FILTER: &str = "opss=debug,info";

/// Keeps the non-blocking writers flushing until dropped.
pub struct TelemetryGuard {
    _guards: Vec<WorkerGuard>,
}

pub fn init(config: &LoggingConfig) -> TelemetryGuard {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let mut guards = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(stdout_filter)
            .boxed(),
    );

    let mut file_setup_error = None;
    if config.file_logging {
        match fs::create_dir_all(&config.dir) {
            Ok(()) => {
                let (writer, guard) = tracing_appender::non_blocking(RollingFileAppender::new(
                    Rotation::DAILY,
                    &config.dir,
                    &config.error_file,
                ));
                guards.push(guard);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_filter(LevelFilter::ERROR)
                        .boxed(),
                );

                let (writer, guard) = tracing_appender::non_blocking(RollingFileAppender::new(
                    Rotation::DAILY,
                    &config.dir,
                    &config.usage_file,
                ));
                guards.push(guard);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(false)
                        .with_level(false)
                        .with_filter(filter_fn(|meta| meta.target() == USAGE_TARGET))
                        .boxed(),
                );
            }
            Err(err) => {
                file_setup_error = Some(format!("log dir init failed for {}: {err}", config.dir.display()));
            }
        }
    }

    Registry::default().with(layers).init();

    if let Some(error) = file_setup_error {
        tracing::warn!("{error}");
    }

    TelemetryGuard { _guards: guards }
}
