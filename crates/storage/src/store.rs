// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! The document-store collaborator interface

use std::sync::Arc;

use async_trait::async_trait;
use orgops_data_model::{OrgId, Organization, UserDocument, UserId, UserUpdate};

use crate::pagination::{Node, Page, Pagination};

/// The maximum number of operations the backend accepts in one atomic write
/// group
pub const MAX_WRITE_GROUP_SIZE: usize = 500;

/// The error type returned by the document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write group already holds [`MAX_WRITE_GROUP_SIZE`] operations and
    /// cannot accept another one. This is a caller bug: updates must be
    /// chunked before staging.
    #[error("write group already holds {MAX_WRITE_GROUP_SIZE} operations")]
    WriteGroupFull,

    /// The underlying backend failed
    #[error("document store backend failed")]
    Backend {
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl StoreError {
    /// Wrap a backend error
    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(source),
        }
    }
}

/// A shareable handle to a [`DocumentStore`]
pub type BoxDocumentStore = Arc<dyn DocumentStore>;

/// A multi-tenant document store
///
/// Listings are paginated; callers must loop until
/// [`Page::has_next_page`][crate::Page] is false. Listing order is whatever
/// the backend returns; no re-sorting is performed on top of it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List a page of organizations
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails
    async fn list_organizations(
        &self,
        pagination: Pagination,
    ) -> Result<Page<Organization>, StoreError>;

    /// List a page of the user documents owned by an organization
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails
    async fn list_users(
        &self,
        org_id: &OrgId,
        pagination: Pagination,
    ) -> Result<Page<UserDocument>, StoreError>;

    /// Fetch a single organization
    ///
    /// Returns `None` if the organization does not exist
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails
    async fn get_organization(&self, org_id: &OrgId) -> Result<Option<Organization>, StoreError>;

    /// Fetch a single user document
    ///
    /// Returns `None` if the document does not exist
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails
    async fn get_user(
        &self,
        org_id: &OrgId,
        user_id: &UserId,
    ) -> Result<Option<UserDocument>, StoreError>;

    /// Start a new, empty write group
    fn write_group(&self) -> Box<dyn WriteGroup>;
}

/// A bounded batch of document updates, committed atomically
///
/// The backend applies a committed group in full or not at all; partial
/// application is never observable. A group holds at most
/// [`MAX_WRITE_GROUP_SIZE`] operations.
#[async_trait]
pub trait WriteGroup: Send {
    /// Stage a partial update to a user document
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteGroupFull`] if the group is already at
    /// capacity
    fn update(
        &mut self,
        org_id: &OrgId,
        user_id: &UserId,
        update: UserUpdate,
    ) -> Result<(), StoreError>;

    /// The number of operations staged so far
    fn len(&self) -> usize;

    /// Whether no operation was staged
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commit the group as a single atomic operation
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the commit; in that case
    /// none of the staged updates were applied
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

impl Node for Organization {
    fn cursor(&self) -> String {
        self.id.to_string()
    }
}

impl Node for UserDocument {
    fn cursor(&self) -> String {
        self.id.to_string()
    }
}
