// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Utilities to manage paginated listings.
//!
//! Listings are forward-only: the cursor is the opaque id of the last item of
//! the previous page. Backends fetch `count + 1` items and let
//! [`Pagination::process`] decide whether there is a further page.

/// Pagination parameters for a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// The cursor to resume after, if any
    pub after: Option<String>,

    /// The maximum number of items to return
    pub count: usize,
}

/// An item in a page, with an opaque cursor
pub trait Node {
    /// The cursor of that particular item
    fn cursor(&self) -> String;
}

impl Pagination {
    /// Creates a [`Pagination`] which gets the first N items
    #[must_use]
    pub const fn first(first: usize) -> Self {
        Self {
            after: None,
            count: first,
        }
    }

    /// Get items after the given cursor
    #[must_use]
    pub fn after(mut self, cursor: String) -> Self {
        self.after = Some(cursor);
        self
    }

    /// Process the items returned by a backend which fetched `count + 1` of
    /// them, detecting whether a further page exists
    #[must_use]
    pub fn process<T: Node>(&self, mut items: Vec<T>) -> Page<T> {
        let is_full = items.len() == (self.count + 1);
        if is_full {
            items.pop();
        }

        Page {
            has_next_page: is_full,
            items,
        }
    }
}

/// A page of results returned by a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Whether there are more items after this page
    pub has_next_page: bool,

    /// The items in the page
    pub items: Vec<T>,
}

impl<T: Node> Page<T> {
    /// The cursor to resume from for the next page
    ///
    /// Returns `None` on an empty page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<String> {
        self.items.last().map(Node::cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(u32);

    impl Node for Item {
        fn cursor(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_process_detects_next_page() {
        let pagination = Pagination::first(2);

        // Backend returned count + 1 items: there is a next page, and the
        // extra item is dropped
        let page = pagination.process(vec![Item(1), Item(2), Item(3)]);
        assert!(page.has_next_page);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor().unwrap(), "2");

        // Backend returned fewer items: this was the last page
        let page = pagination.process(vec![Item(1)]);
        assert!(!page.has_next_page);
        assert_eq!(page.items.len(), 1);

        let page = pagination.process(Vec::<Item>::new());
        assert!(!page.has_next_page);
        assert_eq!(page.next_cursor(), None);
    }
}
