// Shared builder fixture for customer records and page results.

use crate::modules::customers::core::customer::{CustomerRecord, Metafield};
use crate::modules::customers::core::pagination::{PageCursor, PageResult};

pub struct CustomerRecordBuilder {
    inner: CustomerRecord,
}

impl Default for CustomerRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CustomerRecordBuilder {
    pub fn new() -> Self {
        Self {
            inner: CustomerRecord {
                id: "gid://shopify/Customer/1001".to_string(),
                first_name: "Avery".to_string(),
                last_name: "Smith".to_string(),
                email: "avery.smith@example.com".to_string(),
                metafields: vec![],
            },
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn first_name(mut self, v: impl Into<String>) -> Self {
        self.inner.first_name = v.into();
        self
    }

    pub fn last_name(mut self, v: impl Into<String>) -> Self {
        self.inner.last_name = v.into();
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.inner.email = v.into();
        self
    }

    pub fn with_metafield(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.metafields.push(Metafield {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> CustomerRecord {
        self.inner
    }
}

pub fn page(
    records: Vec<CustomerRecord>,
    has_next_page: bool,
    end_cursor: Option<&str>,
) -> PageResult {
    PageResult {
        records,
        has_next_page,
        end_cursor: end_cursor.map(PageCursor::new),
    }
}

#[cfg(test)]
mod customer_record_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_build_the_default_record() {
        let record = CustomerRecordBuilder::default().build();
        assert_eq!(record.id, "gid://shopify/Customer/1001");
        assert_eq!(record.first_name, "Avery");
        assert_eq!(record.last_name, "Smith");
        assert_eq!(record.email, "avery.smith@example.com");
        assert!(record.metafields.is_empty());
    }

    #[rstest]
    fn it_should_override_fields_and_collect_metafields() {
        let record = CustomerRecordBuilder::new()
            .id("gid://shopify/Customer/7")
            .first_name("Robin")
            .last_name("Doe")
            .email("robin.doe@example.com")
            .with_metafield("ship_to_code", "SHIP-1")
            .with_metafield("navision_account", "NAV-1")
            .build();

        assert_eq!(record.id, "gid://shopify/Customer/7");
        assert_eq!(record.first_name, "Robin");
        assert_eq!(record.metafields.len(), 2);
        assert_eq!(record.metafield("navision_account"), Some("NAV-1"));
    }
}
