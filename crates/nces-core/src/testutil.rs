//! Test utilities: hand-written doubles for the core traits.
//!
//! Enabled for this crate's unit tests and, through the `testutil` feature,
//! for integration tests of the other workspace crates. Doubles use
//! `Arc<Mutex<_>>` so tests can assert on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::traits::Fetcher;

/// Fetcher that replays a queue of canned responses and records every URL
/// it was asked for.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Each call pops the first element. When empty, fetches fail with an
    /// HTTP 404 so an unexpected request cannot pass silently.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience for a sequence of successful pages.
    pub fn with_pages(pages: &[&str]) -> Self {
        Self::with_responses(pages.iter().map(|p| Ok(p.to_string())).collect())
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose URL contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }

    /// Responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(AppError::HttpError(format!("HTTP 404 for {url}")))
        } else {
            responses.remove(0)
        }
    }
}
