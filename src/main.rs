// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use remove_types::{
    BatchConfig, BatchRunner, Converter, DryRunConverter, LineProgress, LogProgress,
    ProgressReporter, SilentProgress, ToolConverter,
};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => BatchConfig::default(),
    };
    let config = cli.apply(base);
    config.validate().context("Invalid configuration")?;

    // Logs go to stderr so stdout carries only package names and tool output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(cli.log_level(config.capture_output))
            }),
        )
        .init();

    info!(
        "Source {}, destination {}, tool {}",
        config.source_root.display(),
        config.destination_root.display(),
        config.tool
    );

    let progress: Box<dyn ProgressReporter> = if cli.log_progress() {
        Box::new(LogProgress::new())
    } else if cli.quiet {
        Box::new(SilentProgress::new())
    } else {
        Box::new(LineProgress::stdout())
    };
    let converter: Box<dyn Converter> = if cli.dry_run {
        Box::new(DryRunConverter::stdout())
    } else {
        Box::new(ToolConverter::from_config(&config))
    };

    let summary = BatchRunner::new(&config, converter.as_ref(), progress.as_ref())
        .run()
        .with_context(|| {
            format!(
                "Batch conversion of {} aborted",
                config.source_root.display()
            )
        })?;

    if summary.total() > 0 {
        eprintln!("{}", summary);
        for failed in &summary.failed {
            eprintln!("  failed: {} ({})", failed.package, failed.outcome);
        }
        for skipped in &summary.skipped {
            eprintln!("  skipped: {} ({})", skipped.package, skipped.reason);
        }
    }

    if !summary.exit_ok(config.fail_on_error) {
        anyhow::bail!("{} of {} conversions failed", summary.failed.len(), summary.total());
    }

    Ok(())
}
