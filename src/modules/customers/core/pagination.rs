use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::customers::core::customer::CustomerRecord;

/// Opaque pagination token. Produced by one page fetch, consumed by the next;
/// never inspected locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PageCursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// One page of the remote result stream, in remote order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<CustomerRecord>,
    pub has_next_page: bool,
    pub end_cursor: Option<PageCursor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no next page available")]
    NoNextPage,
    #[error("already on the first page")]
    NoPreviousPage,
}

/// Cursor state machine for forward/backward navigation.
///
/// The stack holds the cursor that led to each previously visited page, with
/// `None` standing in for the first page, so popping exactly undoes the last
/// advance. `has_next_page` and `end_cursor` are always taken from the most
/// recent fetch result, never inferred locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationState {
    current_cursor: Option<PageCursor>,
    cursor_stack: Vec<Option<PageCursor>>,
    has_next_page: bool,
    end_cursor: Option<PageCursor>,
}

impl PaginationState {
    pub fn current_cursor(&self) -> Option<&PageCursor> {
        self.current_cursor.as_ref()
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn has_previous_page(&self) -> bool {
        !self.cursor_stack.is_empty()
    }

    /// Back to the first page with an empty backward path.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Push the cursor that led here and move onto the last fetch's
    /// continuation cursor.
    pub fn advance(&mut self) -> Result<(), NavigationError> {
        if !self.has_next_page {
            return Err(NavigationError::NoNextPage);
        }
        let Some(end_cursor) = self.end_cursor.clone() else {
            return Err(NavigationError::NoNextPage);
        };
        self.cursor_stack.push(self.current_cursor.take());
        self.current_cursor = Some(end_cursor);
        Ok(())
    }

    /// Pop the backward path into the current cursor. A popped sentinel means
    /// the first page.
    pub fn retreat(&mut self) -> Result<(), NavigationError> {
        match self.cursor_stack.pop() {
            Some(previous) => {
                self.current_cursor = previous;
                Ok(())
            }
            None => Err(NavigationError::NoPreviousPage),
        }
    }

    /// Overwrite the has-more flag and continuation cursor with a fetch
    /// result's page info.
    pub fn absorb(&mut self, has_next_page: bool, end_cursor: Option<PageCursor>) {
        self.has_next_page = has_next_page;
        self.end_cursor = end_cursor;
    }
}
