// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! # Migration
//!
//! High-level logic for the `is_active` backfill run.
//!
//! A run is strictly sequential and single-pass: no cross-tenant parallelism,
//! no locking. Atomicity of each write group is delegated to the backend, and
//! safety against concurrent runs comes from the updates being idempotent.

use orgops_data_model::{OrgId, Organization, UserDocument, UserUpdate};
use serde::Serialize;
use thiserror::Error;
use thiserror_ext::ContextInto;
use tracing::{debug, info};

use orgops_storage::{
    BoxDocumentStore, MAX_WRITE_GROUP_SIZE, Pagination, StoreError,
};

/// How many items to request per listing call while enumerating
const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

/// The error type returned by a backfill run
#[derive(Debug, Error, ContextInto)]
pub enum Error {
    /// A listing call failed
    #[error("error while listing from the document store ({context}): {source}")]
    List {
        /// The underlying store error
        source: StoreError,
        /// Which listing step failed
        context: String,
    },

    /// Staging or committing a write group failed
    #[error("error while writing a group of updates ({context}): {source}")]
    Write {
        /// The underlying store error
        source: StoreError,
        /// Which write step failed
        context: String,
    },
}

/// The outcome of a successful backfill run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    /// How many user documents were updated by this run
    pub updated_count: usize,
}

/// The batched `is_active` backfill engine
///
/// Holds a handle to the document store it operates on; the handle is
/// injected at construction, never looked up ambiently.
pub struct BackfillMigrator {
    store: BoxDocumentStore,
    page_size: usize,
}

impl BackfillMigrator {
    /// Create a migrator operating on the given store
    #[must_use]
    pub fn new(store: BoxDocumentStore) -> Self {
        Self {
            store,
            page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }

    /// Override the listing page size, mainly to exercise pagination in tests
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Run the backfill over the whole directory
    ///
    /// Returns the total number of documents updated. Any listing or commit
    /// failure aborts the run: chunks committed before the failure stay
    /// applied, but no partial count is reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if a listing call or a write-group commit fails.
    #[tracing::instrument(name = "backfill.run", skip_all)]
    pub async fn run(&self) -> Result<BackfillReport, Error> {
        let orgs = self.list_all_organizations().await?;
        info!(organizations = orgs.len(), "Starting is_active backfill");

        let mut updated_count = 0;
        for org in &orgs {
            updated_count += self.backfill_organization(&org.id).await?;
        }

        info!(updated_count, "Backfill finished");
        Ok(BackfillReport { updated_count })
    }

    /// Enumerate every organization, exhausting pagination
    async fn list_all_organizations(&self) -> Result<Vec<Organization>, Error> {
        let mut orgs = Vec::new();
        let mut pagination = Pagination::first(self.page_size);

        loop {
            let page = self
                .store
                .list_organizations(pagination.clone())
                .await
                .into_list("organizations")?;

            let cursor = page.next_cursor();
            let has_next_page = page.has_next_page;
            orgs.extend(page.items);

            if !has_next_page {
                break;
            }

            // An empty page has no cursor to resume from, even when the
            // backend claims there is more
            let Some(cursor) = cursor else { break };
            pagination = Pagination::first(self.page_size).after(cursor);
        }

        Ok(orgs)
    }

    /// Enumerate every user document of one organization, exhausting
    /// pagination
    async fn list_all_users(&self, org_id: &OrgId) -> Result<Vec<UserDocument>, Error> {
        let mut users = Vec::new();
        let mut pagination = Pagination::first(self.page_size);

        loop {
            let page = self
                .store
                .list_users(org_id, pagination.clone())
                .await
                .into_list(format!("users of organization {org_id}"))?;

            let cursor = page.next_cursor();
            let has_next_page = page.has_next_page;
            users.extend(page.items);

            if !has_next_page {
                break;
            }

            let Some(cursor) = cursor else { break };
            pagination = Pagination::first(self.page_size).after(cursor);
        }

        Ok(users)
    }

    /// Backfill one organization, returning how many documents were updated
    async fn backfill_organization(&self, org_id: &OrgId) -> Result<usize, Error> {
        let users = self.list_all_users(org_id).await?;
        debug!(%org_id, users = users.len(), "Processing organization");

        let mut org_updated = 0;

        for chunk in users.chunks(MAX_WRITE_GROUP_SIZE) {
            let mut group = self.store.write_group();

            for doc in chunk {
                if doc.needs_backfill() {
                    group
                        .update(&doc.org_id, &doc.id, UserUpdate::activate())
                        .into_write(format!("staging update for {org_id}/{}", doc.id))?;
                }
            }

            // Fully-migrated chunks commit nothing, so a re-run consumes no
            // write capacity
            if group.is_empty() {
                continue;
            }

            let size = group.len();
            group
                .commit()
                .await
                .into_write(format!("committing updates for organization {org_id}"))?;

            debug!(%org_id, size, "Committed write group");
            org_updated += size;
        }

        Ok(org_updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use orgops_data_model::{Clock, MockClock, Organization, UserDocument};
    use orgops_storage::DocumentStore;
    use orgops_storage_mem::InMemoryDocumentStore;

    use super::*;

    fn user(org: &str, id: &str, is_active: Option<bool>) -> UserDocument {
        UserDocument {
            id: id.parse().unwrap(),
            org_id: org.parse().unwrap(),
            is_active,
            updated_at: None,
            email: None,
            display_name: None,
            extra: serde_json::Map::new(),
        }
    }

    fn setup() -> (InMemoryDocumentStore, Arc<MockClock>) {
        let clock = Arc::new(MockClock::default());
        let store = InMemoryDocumentStore::new(clock.clone());
        (store, clock)
    }

    fn migrator(store: &InMemoryDocumentStore) -> BackfillMigrator {
        BackfillMigrator::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_end_to_end_example() {
        let (store, clock) = setup();
        store.insert_organization(Organization {
            id: "org1".parse().unwrap(),
            name: None,
        });
        store.insert_organization(Organization {
            id: "org2".parse().unwrap(),
            name: None,
        });
        store.insert_user(user("org1", "u1", None));
        store.insert_user(user("org1", "u2", Some(false)));
        store.insert_user(user("org1", "u3", None));
        store.insert_user(user("org2", "u4", None));

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 3);

        let org1 = "org1".parse().unwrap();
        let org2 = "org2".parse().unwrap();

        for (org, id) in [(&org1, "u1"), (&org1, "u3"), (&org2, "u4")] {
            let doc = store
                .get_user(org, &id.parse().unwrap())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(doc.is_active, Some(true));
            assert_eq!(doc.updated_at, Some(clock.now()));
        }

        // u2 already carried the field, whatever its value: untouched
        let u2 = store
            .get_user(&org1, &"u2".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(u2.is_active, Some(false));
        assert_eq!(u2.updated_at, None);
    }

    #[tokio::test]
    async fn test_second_run_is_a_noop() {
        let (store, _clock) = setup();
        for i in 0..10 {
            store.insert_user(user("org1", &format!("u{i}"), None));
        }

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 10);

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 0);

        // The no-op run must not have committed anything
        assert_eq!(store.commit_sizes(), vec![10]);
    }

    #[tokio::test]
    async fn test_chunking_at_the_write_group_limit() {
        let (store, _clock) = setup();
        for i in 0..500 {
            store.insert_user(user("org1", &format!("u{i:04}"), None));
        }

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 500);
        assert_eq!(store.commit_sizes(), vec![500]);
    }

    #[tokio::test]
    async fn test_chunking_one_past_the_limit() {
        let (store, _clock) = setup();
        for i in 0..501 {
            store.insert_user(user("org1", &format!("u{i:04}"), None));
        }

        // A small page size on top, so enumeration has to walk several pages
        let migrator = migrator(&store).with_page_size(100);
        let report = migrator.run().await.unwrap();
        assert_eq!(report.updated_count, 501);
        assert_eq!(store.commit_sizes(), vec![500, 1]);
    }

    #[tokio::test]
    async fn test_zero_page_size_terminates() {
        let (store, _clock) = setup();
        store.insert_user(user("org1", "u1", None));

        // A page size of zero yields empty pages which still claim a next
        // page; enumeration must stop instead of spinning forever
        let report = migrator(&store).with_page_size(0).run().await.unwrap();
        assert_eq!(report.updated_count, 0);
    }

    #[tokio::test]
    async fn test_fully_migrated_chunks_commit_nothing() {
        let (store, _clock) = setup();
        for i in 0..10 {
            store.insert_user(user("org1", &format!("u{i}"), Some(true)));
        }

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 0);
        assert!(store.commit_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_tenants_committed() {
        let (store, _clock) = setup();
        store.insert_user(user("org_a", "u1", None));
        store.insert_user(user("org_b", "u2", None));
        store.break_user_listing("org_b".parse().unwrap());

        let err = migrator(&store).run().await.unwrap_err();
        assert_matches!(err, Error::List { .. });

        // org_a was processed before the failure and stays applied
        let doc = store
            .get_user(&"org_a".parse().unwrap(), &"u1".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.is_active, Some(true));
        assert_eq!(store.commit_sizes(), vec![1]);
    }

    #[tokio::test]
    async fn test_mixed_chunk_only_stages_missing_records() {
        let (store, _clock) = setup();
        store.insert_user(user("org1", "u1", Some(true)));
        store.insert_user(user("org1", "u2", None));
        store.insert_user(user("org1", "u3", Some(false)));
        store.insert_user(user("org1", "u4", None));

        let report = migrator(&store).run().await.unwrap();
        assert_eq!(report.updated_count, 2);
        assert_eq!(store.commit_sizes(), vec![2]);
    }
}
