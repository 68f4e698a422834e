// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Interactions with the document-store backend
//!
//! This crate defines the traits through which the admin operations talk to
//! the multi-tenant document store. The store itself is an external
//! collaborator; only its interface lives here, so that the operations can be
//! exercised against the in-memory backend in `orgops-storage-mem` and wired
//! to the real backend elsewhere.
//!
//! Two traits make up the interface:
//!
//!   - [`DocumentStore`] lists organizations and their user documents, one
//!     page at a time. Callers must loop until [`Page::has_next_page`] is
//!     false: a single listing call is never assumed to return the complete
//!     set.
//!   - [`WriteGroup`] is a bounded batch of document updates, committed
//!     atomically by the backend. A group never holds more than
//!     [`MAX_WRITE_GROUP_SIZE`] operations.

#![deny(clippy::future_not_send, missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod pagination;
mod store;

pub use self::{
    pagination::{Node, Page, Pagination},
    store::{BoxDocumentStore, DocumentStore, MAX_WRITE_GROUP_SIZE, StoreError, WriteGroup},
};
