//! Single-flight catalog search

use thiserror::Error;
use tracing::{info, warn};

use crate::api::CatalogError;
use crate::models::{CatalogEntry, ResultSet};

/// Maximum results requested per search
pub const DEFAULT_LIMIT: usize = 15;

/// Reasons a search submission is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Enter a search query.")]
    EmptyQuery,

    #[error("Search already in progress.")]
    Busy,
}

/// Search the caller must run against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

/// How a finished search went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results published, with their count
    Found(usize),
    /// Search ran but matched nothing
    Empty,
    /// Search failed with this message
    Failed(String),
}

impl SearchOutcome {
    /// Notice text shown to the user
    pub fn message(&self) -> String {
        match self {
            SearchOutcome::Found(_) => "Search completed.".to_string(),
            SearchOutcome::Empty => "No results found.".to_string(),
            SearchOutcome::Failed(msg) => format!("Search failed: {}", msg),
        }
    }
}

#[derive(Debug)]
pub struct SearchCoordinator {
    busy: bool,
    limit: usize,
    query: Option<String>,
    results: ResultSet,
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl SearchCoordinator {
    pub fn new(limit: usize) -> Self {
        Self {
            busy: false,
            limit: limit.max(1),
            query: None,
            results: ResultSet::empty(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Query of the most recent accepted submission
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Currently published results
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Start a search
    ///
    /// Rejected while another search runs; the running one is left alone.
    /// On acceptance the published results are cleared.
    pub fn submit(&mut self, query: &str) -> Result<SearchRequest, SubmitError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SubmitError::EmptyQuery);
        }
        if self.busy {
            return Err(SubmitError::Busy);
        }

        info!(query, limit = self.limit, "search submitted");
        self.busy = true;
        self.query = Some(query.to_string());
        self.results = ResultSet::empty();

        Ok(SearchRequest {
            query: query.to_string(),
            limit: self.limit,
        })
    }

    /// Publish the result of the running search. Always clears busy.
    pub fn complete(&mut self, result: Result<Vec<CatalogEntry>, CatalogError>) -> SearchOutcome {
        self.busy = false;
        match result {
            Ok(entries) => {
                let results = ResultSet::from_entries(entries.into_iter().take(self.limit));
                let count = results.len();
                self.results = results;
                info!(count, "search finished");
                if count == 0 {
                    SearchOutcome::Empty
                } else {
                    SearchOutcome::Found(count)
                }
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                SearchOutcome::Failed(e.to_string())
            }
        }
    }
}
