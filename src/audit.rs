//! Audit log of data-quality anomalies
//!
//! Anomalies are emitted as tracing events on the [`AUDIT_TARGET`] target.
//! [`layer`] writes those events, and only those, as bare lines to the run's
//! log file. [`without_audit`] keeps them off every other layer.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{Metadata, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::filter_fn, fmt::MakeWriter, registry::LookupSpan, Layer};

use crate::oclc::Anomaly;

pub const AUDIT_TARGET: &str = "audit";

/// Record one anomaly in the audit log
pub fn record(anomaly: &Anomaly) {
    tracing::info!(target: AUDIT_TARGET, "{}", anomaly);
}

pub fn is_audit_event(metadata: &Metadata<'_>) -> bool {
    metadata.target() == AUDIT_TARGET
}

fn is_not_audit_event(metadata: &Metadata<'_>) -> bool {
    !is_audit_event(metadata)
}

/// Layer writing audit events to `writer`, one message per line without
/// timestamp, level or target
pub fn layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(filter_fn(is_audit_event))
}

/// Wrap `layer` so that it never sees audit events
pub fn without_audit<S, L>(layer: L) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    L: Layer<S>,
{
    layer.with_filter(filter_fn(is_not_audit_event))
}

/// `{timestamp}-{input stem}.txt`, timestamp in UTC with dots for colons
pub fn log_file_name(started_at: DateTime<Utc>, input_file: &str) -> String {
    let stem = Path::new(input_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(input_file);
    format!("{}-{}.txt", started_at.format("%Y-%m-%dT%H.%M.%S"), stem)
}

/// Non-blocking writer appending to `dir/file_name`.
///
/// The returned guard flushes and closes the file when dropped.
pub fn file_writer(dir: &Path, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = tracing_appender::rolling::never(dir, file_name);
    tracing_appender::non_blocking(appender)
}
