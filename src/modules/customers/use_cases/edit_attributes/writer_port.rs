use async_trait::async_trait;
use thiserror::Error;

/// Metafield-write failures. There is no automatic retry; a failed write must
/// never be reflected in the page cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("transport failure submitting the metafield write: {0}")]
    TransportFailure(String),

    #[error("remote directory rejected the metafield write: {0}")]
    RemoteRejected(String),
}

/// Outbound port for single key/value updates to a customer's custom
/// attributes. Key, value, namespace and type are passed through unvalidated;
/// the remote system is authoritative.
#[async_trait]
pub trait MetafieldWriter: Send + Sync {
    async fn write_metafield(
        &self,
        customer_id: &str,
        key: &str,
        value: &str,
        namespace: &str,
        value_type: &str,
    ) -> Result<(), WriteError>;
}
