//! Tresor manifests
//!
//! Reads a shelf number mapping and writes one IIIF manifest per shelf item.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use tresor_manifests::{
    audit,
    config::AppConfig,
    services::{self, input},
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Mapping file name inside the input directory; prompts when omitted
    input_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let cli = Cli::parse();

    let file_name = match cli.input_file {
        Some(name) => name,
        None => {
            let files = input::list_input_files(&config.paths.input_dir).await?;
            input::prompt_selection(&files, io::stdin().lock(), io::stdout())?
        }
    };
    let input_path: PathBuf = config.paths.input_dir.join(&file_name);

    // Initialize tracing: console output plus the audit log of this run
    tokio::fs::create_dir_all(&config.paths.log_dir).await?;
    let log_name = audit::log_file_name(chrono::Utc::now(), &file_name);
    let log_path = config.paths.log_dir.join(&log_name);
    let (audit_writer, audit_guard) = audit::file_writer(&config.paths.log_dir, &log_name);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tresor_manifests={}", config.logging.level).into())
        .add_directive(format!("{}=info", audit::AUDIT_TARGET).parse()?);

    let console_layer = match config.logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        _ => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(audit::without_audit(console_layer))
        .with(audit::layer(audit_writer))
        .init();

    let mapping = input::load_mapping(&input_path).await?;

    tracing::info!(
        "Starting tresor-manifests v{} with {} ({} entries)",
        env!("CARGO_PKG_VERSION"),
        input_path.display(),
        mapping.entries.len()
    );

    let mut pipeline = services::live_pipeline(&config).await?;
    let summary = pipeline.run(&mapping.entries).await?;

    // Flush and close the audit log
    drop(audit_guard);

    tracing::info!(
        "Done. {} of {} files written ({} created, {} overwritten, {} without records, {} failed).",
        summary.written(),
        mapping.total,
        summary.created,
        summary.overwritten,
        summary.skipped,
        summary.failed
    );
    tracing::info!("Log: {}", log_path.display());

    Ok(())
}
