use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use cert_extractor::client::{
    LogQueryClient, QueryError, QueryHandle, QueryPage, QueryStatus, ResultRow,
};
use cert_extractor::query::QueryRequest;

/// In-memory query service that replays scripted pages.
pub struct FakeQueryClient {
    pages: Mutex<VecDeque<Result<QueryPage, String>>>,
    #[allow(dead_code)]
    pub requests: Mutex<Vec<QueryRequest>>,
    #[allow(dead_code)]
    pub fetch_times: Mutex<Vec<Instant>>,
    pub start_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    start_delay: Duration,
    fetch_delay: Duration,
}

impl FakeQueryClient {
    pub fn new(pages: Vec<QueryPage>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    #[allow(dead_code)]
    pub fn with_results(pages: Vec<Result<QueryPage, String>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
            fetch_times: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            start_delay: Duration::ZERO,
            fetch_delay: Duration::ZERO,
        }
    }

    /// Makes `start_query` stall for `delay` before answering.
    #[allow(dead_code)]
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Makes every `get_query_results` stall for `delay` before answering.
    #[allow(dead_code)]
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    #[allow(dead_code)]
    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl LogQueryClient for FakeQueryClient {
    async fn start_query(&self, request: &QueryRequest) -> Result<QueryHandle, QueryError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        Ok(QueryHandle("fake-query-id".to_string()))
    }

    async fn get_query_results(&self, handle: &QueryHandle) -> Result<QueryPage, QueryError> {
        assert_eq!(handle.as_str(), "fake-query-id");
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_times
            .lock()
            .expect("fetch times lock")
            .push(Instant::now());
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        let next = self.pages.lock().expect("pages lock").pop_front();
        match next {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(QueryError::GetResults(message)),
            None => Ok(running()),
        }
    }
}

#[allow(dead_code)]
pub fn running() -> QueryPage {
    QueryPage {
        status: QueryStatus::Running,
        rows: Vec::new(),
    }
}

pub fn complete(rows: Vec<ResultRow>) -> QueryPage {
    QueryPage {
        status: QueryStatus::Complete,
        rows,
    }
}
