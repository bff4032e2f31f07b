use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::cli::{self, CliError};
use crate::client::{LogQueryClient, QueryError};
use crate::config::{Config, ExtractorSettings};
use crate::extract::{self, ExtractError};
use crate::persist::{self, PersistError};
use crate::poller::{self, PollError};
use crate::query::{QueryParams, QueryRequest};
use crate::shutdown::{or_shutdown, shutdown_pending};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error("cancelled by shutdown signal")]
    Cancelled,
    #[error("query returned no rows for store {store_id}")]
    NoResults { store_id: String },
    #[error("first result row has no @message field")]
    MissingMessage,
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCertificate {
    pub password: String,
    pub path: PathBuf,
}

/// Finds the upload request for `params` and writes its certificate.
pub async fn extract_certificate<C: LogQueryClient>(
    client: &C,
    params: &QueryParams,
    settings: &ExtractorSettings,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<ExtractedCertificate, AppError> {
    let request = QueryRequest::new(settings.log_group.clone(), params);
    tracing::info!(
        store_id = %params.store_id,
        log_group = %request.log_group,
        start = request.window.start,
        end = request.window.end,
        "Starting log query"
    );

    let handle = or_shutdown(client.start_query(&request), shutdown)
        .await
        .ok_or(AppError::Cancelled)??;
    tracing::debug!(query_id = handle.as_str(), "Query started");

    let rows = poller::poll_until_complete(client, &handle, &settings.poll, shutdown).await?;
    tracing::info!(query_id = handle.as_str(), rows = rows.len(), "Query finished");

    let first = rows.first().ok_or_else(|| AppError::NoResults {
        store_id: params.store_id.clone(),
    })?;
    let message = extract::message_field(first).ok_or(AppError::MissingMessage)?;
    let payload = extract::extract_payload(message)?;
    if shutdown_pending(shutdown) {
        tracing::info!(store_id = %params.store_id, "Shutdown requested, certificate not written");
        return Err(AppError::Cancelled);
    }
    let path = persist::save_certificate(&payload, &settings.output_dir)?;

    Ok(ExtractedCertificate {
        password: payload.password,
        path,
    })
}

/// Resolves inputs, then connects, then extracts. `connect` is only called
/// once the inputs are valid. Every awaited step yields to a shutdown signal.
pub async fn run<I, T, C, F, Fut>(
    config: &Config,
    args: I,
    connect: F,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<ExtractedCertificate, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: LogQueryClient,
    F: FnOnce() -> Fut,
    Fut: Future<Output = C>,
{
    let params = cli::resolve_input(config.debug_inputs, args, config.upload_utc_offset_hours)?;
    let client = or_shutdown(connect(), shutdown)
        .await
        .ok_or(AppError::Cancelled)?;
    extract_certificate(&client, &params, &config.extractor_settings(), shutdown).await
}
