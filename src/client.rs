use std::future::Future;

use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::config::Region;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::{QueryStatus as SdkQueryStatus, ResultField};
use thiserror::Error;

use crate::config::AwsConfig;
use crate::query::QueryRequest;

/// Opaque id of a running Logs Insights query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryHandle(pub String);

impl QueryHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Cancelled,
    Timeout,
    Unknown(String),
}

impl QueryStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            "Timeout" => Self::Timeout,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Timeout => "Timeout",
            Self::Unknown(raw) => raw,
        }
    }

    /// Finished without producing results.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::Timeout)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result row: `(field, value)` pairs in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub fields: Vec<(String, String)>,
}

impl ResultRow {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage {
    pub status: QueryStatus,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("start query failed: {0}")]
    StartQuery(String),
    #[error("get query results failed: {0}")]
    GetResults(String),
    #[error("start query returned no query id")]
    MissingQueryId,
}

/// Submit-then-poll access to a log query service.
pub trait LogQueryClient {
    fn start_query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryHandle, QueryError>> + Send;

    fn get_query_results(
        &self,
        handle: &QueryHandle,
    ) -> impl Future<Output = Result<QueryPage, QueryError>> + Send;
}

#[derive(Debug, Clone)]
pub struct CloudWatchQueryClient {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchQueryClient {
    /// Credentials come from the SDK default chain (env, profile, role).
    pub async fn from_config(config: &AwsConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(&sdk_config),
        }
    }

    pub fn new(client: aws_sdk_cloudwatchlogs::Client) -> Self {
        Self { client }
    }
}

impl LogQueryClient for CloudWatchQueryClient {
    async fn start_query(&self, request: &QueryRequest) -> Result<QueryHandle, QueryError> {
        let output = self
            .client
            .start_query()
            .log_group_name(&request.log_group)
            .start_time(request.window.start)
            .end_time(request.window.end)
            .query_string(&request.query_string)
            .send()
            .await
            .map_err(|e| QueryError::StartQuery(DisplayErrorContext(e).to_string()))?;

        output
            .query_id()
            .map(|id| QueryHandle(id.to_string()))
            .ok_or(QueryError::MissingQueryId)
    }

    async fn get_query_results(&self, handle: &QueryHandle) -> Result<QueryPage, QueryError> {
        let output = self
            .client
            .get_query_results()
            .query_id(handle.as_str())
            .send()
            .await
            .map_err(|e| QueryError::GetResults(DisplayErrorContext(e).to_string()))?;

        let status = output
            .status()
            .map(sdk_status)
            .unwrap_or_else(|| QueryStatus::Unknown(String::new()));
        let rows = output.results().iter().map(|row| to_row(row)).collect();

        Ok(QueryPage { status, rows })
    }
}

fn sdk_status(status: &SdkQueryStatus) -> QueryStatus {
    QueryStatus::parse(status.as_str())
}

fn to_row(fields: &[ResultField]) -> ResultRow {
    ResultRow::new(fields.iter().map(|f| {
        (
            f.field().unwrap_or_default().to_string(),
            f.value().unwrap_or_default().to_string(),
        )
    }))
}
