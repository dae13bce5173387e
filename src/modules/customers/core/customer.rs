use serde::{Deserialize, Serialize};

/// Namespace all custom attributes live under on the remote side.
pub const METAFIELD_NAMESPACE: &str = "custom";
/// Remote value type for both custom attributes.
pub const METAFIELD_TYPE: &str = "single_line_text_field";

pub const SHIP_TO_CODE_KEY: &str = "ship_to_code";
pub const NAVISION_ACCOUNT_KEY: &str = "navision_account";

/// A namespaced key/value attribute attached to a customer by the remote
/// directory. Only the key and value are part of the read model; namespace
/// and type exist solely on the write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub key: String,
    pub value: String,
}

/// One customer as returned by the remote directory. The id is opaque and may
/// be a composite global id (`gid://shopify/Customer/42`); it is stored
/// untouched and reused verbatim on writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub metafields: Vec<Metafield>,
}

impl CustomerRecord {
    /// Trailing segment of the id for human-readable display. Plain ids are
    /// returned unchanged.
    pub fn display_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    pub fn metafield(&self, key: &str) -> Option<&str> {
        self.metafields
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.value.as_str())
    }

    /// Overwrites the value of an existing key, or appends a new entry.
    /// Applying the same key/value twice leaves the record as after one
    /// application.
    pub fn upsert_metafield(&mut self, key: &str, value: &str) {
        match self.metafields.iter_mut().find(|m| m.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => self.metafields.push(Metafield {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
}
