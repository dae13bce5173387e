use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::modules::customers::core::cache::PageCache;
use crate::modules::customers::core::customer::CustomerRecord;
use crate::modules::customers::core::pagination::{NavigationError, PaginationState};
use crate::modules::customers::use_cases::browse_customers::directory_port::{
    CustomerDirectory, FetchError,
};

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// What the presentation layer renders: the cached page plus the two
/// navigation affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub records: Vec<CustomerRecord>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Default)]
struct BrowseState {
    pagination: PaginationState,
    active_query: Option<String>,
    issued_generation: u64,
    applied_generation: u64,
}

/// Stateful browse session over the remote directory.
///
/// Every operation derives a prospective pagination state, fetches with no
/// lock held, and commits pagination, query and cache together only when the
/// fetch succeeds. A failed fetch therefore leaves everything at its last
/// successful value.
///
/// Fetches are stamped with a monotonically increasing generation at
/// dispatch; a completion whose generation is not newer than the last applied
/// one is discarded, so an old fetch finishing out of order can never
/// overwrite newer state.
pub struct BrowseCustomers {
    directory: Arc<dyn CustomerDirectory>,
    cache: Arc<Mutex<PageCache>>,
    state: Mutex<BrowseState>,
}

impl BrowseCustomers {
    pub fn new(directory: Arc<dyn CustomerDirectory>, cache: Arc<Mutex<PageCache>>) -> Self {
        Self {
            directory,
            cache,
            state: Mutex::new(BrowseState::default()),
        }
    }

    /// Clears the cursor history and refetches the first page under the new
    /// search query.
    pub async fn reset(&self, query: Option<String>) -> Result<PageView, BrowseError> {
        let (generation, pagination, query) = {
            let mut state = self.state.lock().await;
            state.issued_generation += 1;
            (
                state.issued_generation,
                PaginationState::default(),
                normalize_query(query),
            )
        };
        self.fetch_and_commit(generation, pagination, query).await
    }

    /// Advances onto the continuation cursor of the last successful fetch.
    pub async fn next(&self) -> Result<PageView, BrowseError> {
        let (generation, pagination, query) = {
            let mut state = self.state.lock().await;
            let mut pagination = state.pagination.clone();
            pagination.advance()?;
            state.issued_generation += 1;
            (
                state.issued_generation,
                pagination,
                state.active_query.clone(),
            )
        };
        self.fetch_and_commit(generation, pagination, query).await
    }

    /// Pops the cursor history back onto the previous page.
    pub async fn prev(&self) -> Result<PageView, BrowseError> {
        let (generation, pagination, query) = {
            let mut state = self.state.lock().await;
            let mut pagination = state.pagination.clone();
            pagination.retreat()?;
            state.issued_generation += 1;
            (
                state.issued_generation,
                pagination,
                state.active_query.clone(),
            )
        };
        self.fetch_and_commit(generation, pagination, query).await
    }

    /// Refetches the current cursor under the active query, keeping history.
    pub async fn refresh(&self) -> Result<PageView, BrowseError> {
        let (generation, pagination, query) = {
            let mut state = self.state.lock().await;
            state.issued_generation += 1;
            (
                state.issued_generation,
                state.pagination.clone(),
                state.active_query.clone(),
            )
        };
        self.fetch_and_commit(generation, pagination, query).await
    }

    /// The current page view from cache, without touching the remote.
    pub async fn snapshot(&self) -> PageView {
        let state = self.state.lock().await;
        let cache = self.cache.lock().await;
        view_of(&state, &cache)
    }

    async fn fetch_and_commit(
        &self,
        generation: u64,
        mut pagination: PaginationState,
        query: Option<String>,
    ) -> Result<PageView, BrowseError> {
        let result = self
            .directory
            .fetch_page(pagination.current_cursor(), query.as_deref())
            .await
            .inspect_err(|error| tracing::warn!(%error, "page fetch failed"))?;

        let mut state = self.state.lock().await;
        if generation <= state.applied_generation {
            tracing::warn!(
                generation,
                applied = state.applied_generation,
                "discarding stale page fetch"
            );
            let cache = self.cache.lock().await;
            return Ok(view_of(&state, &cache));
        }

        pagination.absorb(result.has_next_page, result.end_cursor);
        state.pagination = pagination;
        state.active_query = query;
        state.applied_generation = generation;

        let mut cache = self.cache.lock().await;
        cache.replace(result.records);
        Ok(view_of(&state, &cache))
    }
}

fn view_of(state: &BrowseState, cache: &PageCache) -> PageView {
    PageView {
        records: cache.snapshot(),
        has_next_page: state.pagination.has_next_page(),
        has_previous_page: state.pagination.has_previous_page(),
    }
}

fn normalize_query(query: Option<String>) -> Option<String> {
    query.filter(|q| !q.trim().is_empty())
}
