use crate::modules::customers::core::customer::{
    CustomerRecord, NAVISION_ACCOUNT_KEY, SHIP_TO_CODE_KEY,
};

/// The modal edit state machine: either no edit is in progress, or exactly
/// one customer is being edited with both drafts present. A single sum type
/// rules out the inconsistent combinations that separate mutable fields
/// would allow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Closed,
    Editing {
        customer_id: String,
        draft_ship_to_code: String,
        draft_navision_account: String,
    },
}

impl EditSession {
    /// Opens an edit for one customer, prefilling both drafts from the
    /// record's current metafields (empty when absent).
    pub fn open(record: &CustomerRecord) -> Self {
        Self::Editing {
            customer_id: record.id.clone(),
            draft_ship_to_code: record.metafield(SHIP_TO_CODE_KEY).unwrap_or_default().to_string(),
            draft_navision_account: record
                .metafield(NAVISION_ACCOUNT_KEY)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn set_ship_to_code(&mut self, value: impl Into<String>) {
        if let Self::Editing {
            draft_ship_to_code, ..
        } = self
        {
            *draft_ship_to_code = value.into();
        }
    }

    pub fn set_navision_account(&mut self, value: impl Into<String>) {
        if let Self::Editing {
            draft_navision_account,
            ..
        } = self
        {
            *draft_navision_account = value.into();
        }
    }

    /// Discards the drafts.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}
