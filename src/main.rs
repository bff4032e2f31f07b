use std::process::ExitCode;

use cert_extractor::cli::CliError;
use cert_extractor::client::CloudWatchQueryClient;
use cert_extractor::config::Config;
use cert_extractor::extractor::{run, AppError};
use cert_extractor::logging::{init_tracing, LogConfig};
use cert_extractor::poller::PollError;
use tokio::sync::broadcast;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig {
        log_level: config.log_level.clone(),
        enable_file_logs: config.enable_file_logs,
        log_dir: config.log_dir.clone(),
    });
    tracing::debug!(?config, "Loaded configuration");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(shutdown_signal(shutdown_tx));

    let aws = config.aws.clone();
    let connect = || async move { CloudWatchQueryClient::from_config(&aws).await };

    match run(&config, std::env::args_os(), connect, &mut shutdown_rx).await {
        Ok(extracted) => {
            println!(
                "Certificate extracted successfully, file {}",
                extracted
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| extracted.path.display().to_string())
            );
            ExitCode::SUCCESS
        }
        Err(AppError::Cli(CliError::Usage(e))) => e.exit(),
        Err(AppError::Cli(CliError::Input(e))) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
        Err(AppError::Cancelled | AppError::Poll(PollError::Cancelled)) => {
            tracing::warn!("Certificate extraction cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            tracing::error!(error = %e, "Certificate extraction failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    let _ = shutdown_tx.send(());
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
