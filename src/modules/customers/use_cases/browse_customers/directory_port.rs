use async_trait::async_trait;
use thiserror::Error;

use crate::modules::customers::core::pagination::{PageCursor, PageResult};

/// Page-fetch failures. All variants mean "no partial result": callers must
/// leave their last successful state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("remote directory is not configured")]
    ConfigurationMissing,

    #[error("transport failure talking to the remote directory: {0}")]
    TransportFailure(String),

    #[error("remote directory rejected the request: {0}")]
    RemoteRejected(String),

    #[error("remote directory returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Outbound port to the remote customer directory.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Fetches one page at `cursor` (None means the first page), optionally
    /// narrowed by a search term matched remotely against name/email.
    /// Ordering is whatever the remote returns.
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        search: Option<&str>,
    ) -> Result<PageResult, FetchError>;
}
