use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::modules::customers::core::cache::PageCache;
use crate::modules::customers::core::customer::{
    METAFIELD_NAMESPACE, METAFIELD_TYPE, NAVISION_ACCOUNT_KEY, SHIP_TO_CODE_KEY,
};
use crate::modules::customers::core::edit_session::EditSession;
use crate::modules::customers::use_cases::edit_attributes::writer_port::{
    MetafieldWriter, WriteError,
};

#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("edit session is not open")]
    SessionClosed,
}

/// Applies metafield edits through the writer port and patches the shared
/// page cache only after the remote confirms the write.
pub struct EditAttributes {
    writer: Arc<dyn MetafieldWriter>,
    cache: Arc<Mutex<PageCache>>,
}

impl EditAttributes {
    pub fn new(writer: Arc<dyn MetafieldWriter>, cache: Arc<Mutex<PageCache>>) -> Self {
        Self { writer, cache }
    }

    /// Single key/value update. The cache is patched only on success; a
    /// customer outside the cached page is written remotely but not patched.
    pub async fn update_metafield(
        &self,
        customer_id: &str,
        key: &str,
        value: &str,
        namespace: &str,
        value_type: &str,
    ) -> Result<(), EditError> {
        self.writer
            .write_metafield(customer_id, key, value, namespace, value_type)
            .await?;

        let mut cache = self.cache.lock().await;
        if !cache.upsert_metafield(customer_id, key, value) {
            tracing::warn!(customer_id, key, "written customer is not on the cached page");
        }
        Ok(())
    }

    /// Saves an open edit session: both attribute writes run concurrently and
    /// the cache is patched only when both succeed. On any failure the cache
    /// stays untouched, since a partial patch would desynchronize it from
    /// remote truth; the successful half is not rolled back remotely.
    pub async fn save_edit(&self, session: &EditSession) -> Result<(), EditError> {
        let EditSession::Editing {
            customer_id,
            draft_ship_to_code,
            draft_navision_account,
        } = session
        else {
            return Err(EditError::SessionClosed);
        };

        let (ship, navision) = tokio::join!(
            self.writer.write_metafield(
                customer_id,
                SHIP_TO_CODE_KEY,
                draft_ship_to_code,
                METAFIELD_NAMESPACE,
                METAFIELD_TYPE,
            ),
            self.writer.write_metafield(
                customer_id,
                NAVISION_ACCOUNT_KEY,
                draft_navision_account,
                METAFIELD_NAMESPACE,
                METAFIELD_TYPE,
            ),
        );
        ship?;
        navision?;

        let mut cache = self.cache.lock().await;
        cache.upsert_metafield(customer_id, SHIP_TO_CODE_KEY, draft_ship_to_code);
        cache.upsert_metafield(customer_id, NAVISION_ACCOUNT_KEY, draft_navision_account);
        Ok(())
    }
}
