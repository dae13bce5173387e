use crate::modules::customers::core::customer::CustomerRecord;

/// The currently displayed page of customer records.
///
/// Records are replaced wholesale on every successful fetch; after a
/// confirmed metafield write the affected record is patched in place instead
/// of refetching.
#[derive(Debug, Default)]
pub struct PageCache {
    records: Vec<CustomerRecord>,
}

impl PageCache {
    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<CustomerRecord> {
        self.records.clone()
    }

    /// Discards the previous page entirely. No identity is preserved across
    /// pages.
    pub fn replace(&mut self, records: Vec<CustomerRecord>) {
        self.records = records;
    }

    /// Patches one record's metafield by key. Returns false when the customer
    /// is not on the cached page.
    pub fn upsert_metafield(&mut self, customer_id: &str, key: &str, value: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == customer_id) {
            Some(record) => {
                record.upsert_metafield(key, value);
                true
            }
            None => false,
        }
    }
}
