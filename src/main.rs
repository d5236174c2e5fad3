mod api;
mod application;
mod cli;
mod config;
mod domain;
mod ui;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, ApiConfig};
use crate::application::DownloadCoordinator;
use crate::cli::Args;
use crate::config::FileConfigStore;
use crate::domain::{AppError, DownloadOutcome};
use crate::ui::TerminalProgress;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Cancels the token on Ctrl-C; the transfer loop notices between chunks.
fn watch_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            cancel.cancel();
        }
    });
}

async fn run(args: Args, cancel: &CancellationToken) -> Result<DownloadOutcome, AppError> {
    let store = FileConfigStore::new(&args.config);
    let api_client = ApiClient::new(ApiConfig::default())?;
    let mut coordinator = DownloadCoordinator::new(api_client);
    let mut progress = TerminalProgress::new();

    let result = coordinator
        .run(&args.job(), &store, &mut progress, cancel)
        .await;
    debug!(phase = ?coordinator.phase(), "run finished");
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cancel = CancellationToken::new();
    watch_interrupt(cancel.clone());

    match run(args, &cancel).await {
        Ok(outcome) => {
            println!("\nDownload completed: {}", outcome.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
