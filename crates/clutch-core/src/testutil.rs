//! Test utilities: a scripted mock fetcher and record builders.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::Company;
use crate::traits::Fetcher;

/// Mock fetcher that pops scripted responses and records requested URLs.
///
/// Each `fetch` call consumes the next queued response; an exhausted queue
/// answers with an empty page.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
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
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body></body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

/// A complete record with every optional field absent.
pub fn make_test_company(name: &str, profile_url: &str) -> Company {
    Company {
        name: name.to_string(),
        profile_url: profile_url.to_string(),
        website: None,
        rating: None,
        review_count: None,
        hourly_rate: None,
        min_project_size: None,
        employee_count: None,
        location: None,
        description: None,
        logo_url: None,
        verified: false,
    }
}
