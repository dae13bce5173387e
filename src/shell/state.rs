use std::sync::Arc;

use tokio::sync::Mutex;

use crate::modules::customers::core::cache::PageCache;
use crate::modules::customers::use_cases::browse_customers::directory_port::CustomerDirectory;
use crate::modules::customers::use_cases::browse_customers::handler::BrowseCustomers;
use crate::modules::customers::use_cases::edit_attributes::handler::EditAttributes;
use crate::modules::customers::use_cases::edit_attributes::writer_port::MetafieldWriter;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn CustomerDirectory>,
    pub browse: Arc<BrowseCustomers>,
    pub editor: Arc<EditAttributes>,
}

impl AppState {
    /// Wires the browse and edit handlers around one shared page cache, so a
    /// confirmed edit is visible on the cached page without a refetch.
    pub fn new(directory: Arc<dyn CustomerDirectory>, writer: Arc<dyn MetafieldWriter>) -> Self {
        let cache = Arc::new(Mutex::new(PageCache::default()));
        Self {
            browse: Arc::new(BrowseCustomers::new(directory.clone(), cache.clone())),
            editor: Arc::new(EditAttributes::new(writer, cache)),
            directory,
        }
    }
}
