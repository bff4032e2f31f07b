use thiserror::Error;
use tokio::sync::broadcast;

use crate::client::{LogQueryClient, QueryError, QueryHandle, QueryStatus, ResultRow};
use crate::config::PollPolicy;
use crate::shutdown::or_shutdown;

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("query finished with status {0}")]
    Terminal(QueryStatus),
    #[error("query still incomplete after {attempts} polls")]
    Exhausted { attempts: u32 },
    #[error("polling cancelled")]
    Cancelled,
}

/// Fetches results until the query reports `Complete`.
///
/// The first fetch happens immediately; each further fetch waits
/// `policy.interval`. A terminal failure status, `policy.max_attempts`
/// incomplete fetches, or a shutdown signal end the loop. The signal is
/// observed during fetches as well as between them, and a pending signal
/// wins over a fetch that would have completed. Fetch errors are not retried.
pub async fn poll_until_complete<C: LogQueryClient>(
    client: &C,
    handle: &QueryHandle,
    policy: &PollPolicy,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<Vec<ResultRow>, PollError> {
    let mut attempts = 0u32;
    loop {
        let Some(page) = or_shutdown(client.get_query_results(handle), shutdown).await else {
            tracing::info!(query_id = handle.as_str(), attempts, "Polling cancelled by shutdown");
            return Err(PollError::Cancelled);
        };
        let page = page?;
        attempts += 1;

        match page.status {
            QueryStatus::Complete => {
                tracing::debug!(
                    query_id = handle.as_str(),
                    attempts,
                    rows = page.rows.len(),
                    "Query complete"
                );
                return Ok(page.rows);
            }
            status if status.is_terminal_failure() => {
                tracing::warn!(query_id = handle.as_str(), %status, "Query ended without results");
                return Err(PollError::Terminal(status));
            }
            status => {
                tracing::debug!(
                    query_id = handle.as_str(),
                    %status,
                    attempts,
                    "Query not complete yet"
                );
            }
        }

        if attempts >= policy.max_attempts {
            return Err(PollError::Exhausted { attempts });
        }

        if or_shutdown(tokio::time::sleep(policy.interval), shutdown)
            .await
            .is_none()
        {
            tracing::info!(query_id = handle.as_str(), attempts, "Polling cancelled by shutdown");
            return Err(PollError::Cancelled);
        }
    }
}
