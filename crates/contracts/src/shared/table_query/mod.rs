//! Request-scoped value objects for register queries.
//!
//! Every list/report endpoint builds one [`FilterSpec`] (plus an optional
//! [`SortSpec`] and a [`PageWindow`]) per request and passes it by reference
//! into the data layer. The objects are never mutated after construction.

mod condition;
mod group_key;

pub use condition::{Condition, FieldCondition, FilterSpec};
pub use group_key::GroupKey;

use serde::{Deserialize, Serialize};

/// Sort direction for a single-column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// At most one explicit sort per request; absence means the component's
/// default ordering applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Zero-based page request.
///
/// A window past the end of the data is a valid request and yields an empty
/// page, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page_index: u64,
    pub page_size: u64,
}

impl PageWindow {
    /// Build a window, clamping `page_size` to at least one row group.
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    /// First element index covered by this window.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped_to_one() {
        let page = PageWindow::new(3, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.offset(), 3);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let page = PageWindow::new(u64::MAX, u64::MAX);
        assert_eq!(page.offset(), usize::MAX);
    }
}
