// Shared helpers for the integration tests

use std::cell::RefCell;
use std::collections::HashMap;

use sitesnap::{FetchFailure, Fetcher};
use url::Url;

/// In-memory stand-in for the HTTP session.
///
/// Unknown URLs answer with a 404, every request is remembered.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<String, FetchFailure>>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(canonical(url), Ok(body.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, failure: FetchFailure) -> Self {
        self.responses.insert(canonical(url), Err(failure));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.borrow().contains(&canonical(url))
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        self.requests.borrow_mut().push(url.to_string());

        self.responses
            .get(url.as_str())
            .cloned()
            .unwrap_or(Err(FetchFailure::Status(404)))
    }
}

fn canonical(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}
