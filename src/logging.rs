use std::env;
use std::error::Error;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Logs go to stderr; stdout carries the fetched values.
pub fn init_logger() -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    if !env::var("JSON_LOG").is_ok_and(|s| s.parse().unwrap_or_default()) {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    // Redirect the logs from log library to tracing's subscribers.
    LogTracer::init()?;

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();

    // Non-blocking writer
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(Some(guard))
}
