use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docpress_core::{
    load_config, validate_config, BatchOrchestrator, CancelFlag, CommandStrategy, Config,
    ProgressEvent, ProgressHandle, RetryingConverter, Severity, ZipPackager,
};

/// Buffer size for the progress event channel.
const PROGRESS_BUFFER_SIZE: usize = 256;

/// Convert documents to PDF in parallel and bundle the results into a
/// password-protected zip archive.
#[derive(Debug, Parser)]
#[command(name = "docpress", version, about)]
struct Cli {
    /// Input documents to convert.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path of the output archive. Defaults to documents_<timestamp>.zip
    /// in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Archive password. Omit to write an unencrypted archive.
    #[arg(short, long)]
    password: Option<String>,

    /// Parallel conversions (1-16). Overrides the config file.
    #[arg(long)]
    parallel: Option<usize>,

    /// Maximum attempts per file. Overrides the config file.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Per-attempt timeout in seconds. Overrides the config file.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Converter program to run. Overrides the config file.
    #[arg(long)]
    converter: Option<PathBuf>,

    /// Fallback converter program, tried after a failed primary attempt.
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Configuration file path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the rendered report to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate_config(&config).context("configuration validation failed")?;

    let archive_path = cli.output.clone().unwrap_or_else(default_archive_path);

    let mut converter = RetryingConverter::new(config.converter.clone()).with_primary(Arc::new(
        CommandStrategy::new(&config.converter.program)
            .with_extra_args(config.converter.extra_args.clone()),
    ));
    if let Some(fallback) = &config.converter.fallback_program {
        converter = converter.with_fallback(Arc::new(CommandStrategy::new(fallback)));
    }

    let (progress, progress_rx) = ProgressHandle::channel(PROGRESS_BUFFER_SIZE);
    let printer = tokio::spawn(print_progress(progress_rx));

    let orchestrator = BatchOrchestrator::new(
        config.orchestrator.clone(),
        converter,
        ZipPackager::new(config.packager.clone()),
    )
    .with_progress(progress);

    let cancel = CancelFlag::new();
    spawn_cancel_on_signal(cancel.clone());

    info!(
        "converting {} file(s) into {}",
        cli.inputs.len(),
        archive_path.display()
    );
    let result = orchestrator
        .run(&cli.inputs, &archive_path, cli.password.as_deref(), cancel)
        .await;

    // Drop the orchestrator so the progress channel closes and the printer
    // can drain the final events.
    drop(orchestrator);
    let _ = printer.await;

    match result {
        Ok(output) => {
            println!("{}", output.report.render());
            persist_report(cli.report.as_deref(), &output.report)?;
            println!(
                "Archive: {} ({} entries, {} bytes)",
                output.archive.archive_path.display(),
                output.archive.entries,
                output.archive.archive_bytes
            );
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            // A cancelled run is not an application error.
            if let Some(report) = e.report() {
                persist_report(cli.report.as_deref(), report)?;
            }
            println!("Conversion cancelled; no archive was written.");
            Ok(())
        }
        Err(e) => {
            if let Some(report) = e.report() {
                println!("{}", report.render());
                persist_report(cli.report.as_deref(), report)?;
            }
            Err(e.into())
        }
    }
}

/// Folds command-line overrides into the loaded configuration.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(parallel) = cli.parallel {
        config.orchestrator.max_parallel = parallel;
    }
    if let Some(max_retries) = cli.max_retries {
        config.converter.max_retries = max_retries;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.converter.timeout_secs = timeout_secs;
    }
    if let Some(converter) = &cli.converter {
        config.converter.program = converter.clone();
    }
    if let Some(fallback) = &cli.fallback {
        config.converter.fallback_program = Some(fallback.clone());
    }
}

fn default_archive_path() -> PathBuf {
    PathBuf::from(format!(
        "documents_{}.zip",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

fn persist_report(path: Option<&std::path::Path>, report: &docpress_core::ConversionReport) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, report.render())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("report saved to {}", path.display());
    }
    Ok(())
}

/// Renders progress events as log lines until the channel closes.
async fn print_progress(mut rx: mpsc::Receiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Status { message, severity } => match severity {
                Severity::Info | Severity::Success => info!("{}", message),
                Severity::Warning => warn!("{}", message),
                Severity::Error => error!("{}", message),
            },
            ProgressEvent::Active { completed, total } => {
                info!("conversions completed: {}/{}", completed, total);
            }
            ProgressEvent::Progress { percent } => {
                debug!("progress: {}%", percent);
            }
            ProgressEvent::Finished { .. } => {}
        }
    }
}

/// Trips the cancel flag on Ctrl+C or SIGTERM; in-flight conversions drain.
fn spawn_cancel_on_signal(cancel: CancelFlag) {
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("cancellation requested, letting in-flight conversions finish");
        cancel.cancel();
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_invocation() {
        let cli = Cli::parse_from(["docpress", "a.docx", "b.docx"]);
        assert_eq!(cli.inputs.len(), 2);
        assert!(cli.output.is_none());
        assert!(cli.password.is_none());
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Cli::try_parse_from(["docpress"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "docpress",
            "--parallel",
            "4",
            "--max-retries",
            "2",
            "--timeout-secs",
            "30",
            "--converter",
            "/opt/soffice",
            "a.docx",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.orchestrator.max_parallel, 4);
        assert_eq!(config.converter.max_retries, 2);
        assert_eq!(config.converter.timeout_secs, 30);
        assert_eq!(config.converter.program, PathBuf::from("/opt/soffice"));
    }

    #[test]
    fn test_default_archive_name_has_zip_extension() {
        let path = default_archive_path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("documents_"));
        assert!(name.ends_with(".zip"));
    }
}
