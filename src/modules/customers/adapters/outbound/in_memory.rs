use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::modules::customers::core::pagination::{PageCursor, PageResult};
use crate::modules::customers::use_cases::browse_customers::directory_port::{
    CustomerDirectory, FetchError,
};
use crate::modules::customers::use_cases::edit_attributes::writer_port::{
    MetafieldWriter, WriteError,
};

/// One recorded metafield write, exactly as it crossed the port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub customer_id: String,
    pub key: String,
    pub value: String,
    pub namespace: String,
    pub value_type: String,
}

type PageKey = (Option<String>, Option<String>);

/// In-memory stand-in for the remote directory, scripted per (cursor, query)
/// pair. Unscripted pages come back empty. Failure toggles fire once; fetch
/// delays are consumed in dispatch order so tests can force out-of-order
/// completion. No lock is held across an await.
#[derive(Default)]
pub struct InMemoryDirectory {
    pages: Mutex<HashMap<PageKey, PageResult>>,
    fetch_calls: Mutex<Vec<PageKey>>,
    fetch_delays: Mutex<VecDeque<Duration>>,
    next_fetch_failure: Mutex<Option<FetchError>>,
    writes: Mutex<Vec<RecordedWrite>>,
    next_write_failure: Mutex<Option<WriteError>>,
    keyed_write_failure: Mutex<Option<(String, WriteError)>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_page(&self, cursor: Option<&str>, query: Option<&str>, result: PageResult) {
        self.pages.lock().expect("pages lock poisoned").insert(
            (cursor.map(str::to_string), query.map(str::to_string)),
            result,
        );
    }

    pub fn fail_next_fetch(&self, error: FetchError) {
        *self
            .next_fetch_failure
            .lock()
            .expect("failure lock poisoned") = Some(error);
    }

    pub fn fail_next_write(&self, error: WriteError) {
        *self
            .next_write_failure
            .lock()
            .expect("failure lock poisoned") = Some(error);
    }

    /// Fails every write for the given metafield key, leaving writes for
    /// other keys untouched.
    pub fn fail_writes_with_key(&self, key: &str, error: WriteError) {
        *self
            .keyed_write_failure
            .lock()
            .expect("failure lock poisoned") = Some((key.to_string(), error));
    }

    pub fn delay_fetches(&self, delays: Vec<Duration>) {
        *self.fetch_delays.lock().expect("delays lock poisoned") = delays.into();
    }

    pub fn fetch_log(&self) -> Vec<PageKey> {
        self.fetch_calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().expect("writes lock poisoned").clone()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        search: Option<&str>,
    ) -> Result<PageResult, FetchError> {
        let key = (
            cursor.map(|c| c.as_str().to_string()),
            search.map(str::to_string),
        );
        self.fetch_calls
            .lock()
            .expect("calls lock poisoned")
            .push(key.clone());

        let delay = self
            .fetch_delays
            .lock()
            .expect("delays lock poisoned")
            .pop_front();
        if let Some(delay) = delay {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let failure = self
            .next_fetch_failure
            .lock()
            .expect("failure lock poisoned")
            .take();
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(self
            .pages
            .lock()
            .expect("pages lock poisoned")
            .get(&key)
            .cloned()
            .unwrap_or(PageResult {
                records: vec![],
                has_next_page: false,
                end_cursor: None,
            }))
    }
}

#[async_trait]
impl MetafieldWriter for InMemoryDirectory {
    async fn write_metafield(
        &self,
        customer_id: &str,
        key: &str,
        value: &str,
        namespace: &str,
        value_type: &str,
    ) -> Result<(), WriteError> {
        let failure = self
            .next_write_failure
            .lock()
            .expect("failure lock poisoned")
            .take();
        if let Some(error) = failure {
            return Err(error);
        }

        let keyed = self
            .keyed_write_failure
            .lock()
            .expect("failure lock poisoned")
            .clone();
        if let Some((failing_key, error)) = keyed {
            if failing_key == key {
                return Err(error);
            }
        }

        self.writes
            .lock()
            .expect("writes lock poisoned")
            .push(RecordedWrite {
                customer_id: customer_id.to_string(),
                key: key.to_string(),
                value: value.to_string(),
                namespace: namespace.to_string(),
                value_type: value_type.to_string(),
            });
        Ok(())
    }
}
