// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! An in-memory implementation of the document-store interface
//!
//! This is the backend used by the test suites and local runs. It paginates
//! its listings for real, so callers exercising the interface cannot get away
//! with reading a single page, and it keeps a log of committed write-group
//! sizes so tests can observe chunking behaviour.
//!
//! Listing order is the id order of the underlying `BTreeMap`s, which is
//! stable across calls.

#![deny(clippy::future_not_send)]
#![allow(clippy::module_name_repetitions)]

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex, RwLock},
};

use async_trait::async_trait;
use orgops_data_model::{
    Clock, OrgId, Organization, UserDocument, UserId, UserUpdate, WriteTimestamp,
};
use orgops_storage::{
    DocumentStore, MAX_WRITE_GROUP_SIZE, Page, Pagination, StoreError, WriteGroup,
};
use serde::{Deserialize, Serialize};

/// A serializable snapshot of the whole directory
///
/// Used to seed the store from a file and to persist it back after a run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    /// Every organization with its user documents
    pub organizations: Vec<OrganizationSnapshot>,
}

/// One organization in a [`DirectorySnapshot`]
#[derive(Debug, Serialize, Deserialize)]
pub struct OrganizationSnapshot {
    /// The organization id
    pub id: OrgId,

    /// The display name of the organization, if any
    pub name: Option<String>,

    /// The user documents owned by the organization
    pub users: Vec<UserDocument>,
}

#[derive(Debug, thiserror::Error)]
#[error("user listing unavailable for organization {org_id}")]
struct InjectedListingFailure {
    org_id: OrgId,
}

#[derive(Debug, thiserror::Error)]
#[error("document organizations/{org_id}/users/{user_id} does not exist")]
struct MissingDocument {
    org_id: OrgId,
    user_id: UserId,
}

#[derive(Default)]
struct OrgState {
    name: Option<String>,
    users: BTreeMap<UserId, UserDocument>,
}

#[derive(Default)]
struct State {
    orgs: BTreeMap<OrgId, OrgState>,

    /// Organizations whose user listing fails, for tests
    broken_user_listings: HashSet<OrgId>,
}

struct Inner {
    clock: Arc<dyn Clock + Send + Sync>,
    state: RwLock<State>,

    /// Sizes of the write groups committed so far, in commit order
    commit_log: Mutex<Vec<usize>>,
}

/// An in-memory [`DocumentStore`]
///
/// Cloning gives another handle to the same store.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    inner: Arc<Inner>,
}

impl InMemoryDocumentStore {
    /// Create an empty store which resolves server timestamps with the given
    /// clock
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                state: RwLock::new(State::default()),
                commit_log: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Seed an organization
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn insert_organization(&self, org: Organization) {
        let mut state = self.inner.state.write().unwrap();
        state.orgs.entry(org.id).or_default().name = org.name;
    }

    /// Seed a user document, creating its organization if needed
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn insert_user(&self, doc: UserDocument) {
        let mut state = self.inner.state.write().unwrap();
        state
            .orgs
            .entry(doc.org_id.clone())
            .or_default()
            .users
            .insert(doc.id.clone(), doc);
    }

    /// Remove a user document, returning it if it existed
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn remove_user(&self, org_id: &OrgId, user_id: &UserId) -> Option<UserDocument> {
        let mut state = self.inner.state.write().unwrap();
        state.orgs.get_mut(org_id)?.users.remove(user_id)
    }

    /// Make the user listing of the given organization fail, for tests
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn break_user_listing(&self, org_id: OrgId) {
        let mut state = self.inner.state.write().unwrap();
        state.broken_user_listings.insert(org_id);
    }

    /// The sizes of the write groups committed so far, in commit order
    ///
    /// # Panics
    ///
    /// Panics if the commit log lock is poisoned.
    #[must_use]
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.inner.commit_log.lock().unwrap().clone()
    }

    /// Seed the store from a snapshot
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn load_snapshot(&self, snapshot: DirectorySnapshot) {
        let mut state = self.inner.state.write().unwrap();
        for org in snapshot.organizations {
            let org_state = state.orgs.entry(org.id).or_default();
            org_state.name = org.name;
            for doc in org.users {
                org_state.users.insert(doc.id.clone(), doc);
            }
        }
    }

    /// Dump the whole directory as a snapshot
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> DirectorySnapshot {
        let state = self.inner.state.read().unwrap();
        DirectorySnapshot {
            organizations: state
                .orgs
                .iter()
                .map(|(id, org)| OrganizationSnapshot {
                    id: id.clone(),
                    name: org.name.clone(),
                    users: org.users.values().cloned().collect(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_organizations(
        &self,
        pagination: Pagination,
    ) -> Result<Page<Organization>, StoreError> {
        let state = self.inner.state.read().unwrap();

        let items: Vec<Organization> = state
            .orgs
            .iter()
            .filter(|(id, _)| match &pagination.after {
                Some(cursor) => id.as_str() > cursor.as_str(),
                None => true,
            })
            .take(pagination.count + 1)
            .map(|(id, org)| Organization {
                id: id.clone(),
                name: org.name.clone(),
            })
            .collect();

        Ok(pagination.process(items))
    }

    async fn list_users(
        &self,
        org_id: &OrgId,
        pagination: Pagination,
    ) -> Result<Page<UserDocument>, StoreError> {
        let state = self.inner.state.read().unwrap();

        if state.broken_user_listings.contains(org_id) {
            return Err(StoreError::backend(InjectedListingFailure {
                org_id: org_id.clone(),
            }));
        }

        let users = state.orgs.get(org_id).map(|org| &org.users);

        let items: Vec<UserDocument> = users
            .into_iter()
            .flatten()
            .filter(|(id, _)| match &pagination.after {
                Some(cursor) => id.as_str() > cursor.as_str(),
                None => true,
            })
            .take(pagination.count + 1)
            .map(|(_, doc)| doc.clone())
            .collect();

        Ok(pagination.process(items))
    }

    async fn get_organization(&self, org_id: &OrgId) -> Result<Option<Organization>, StoreError> {
        let state = self.inner.state.read().unwrap();
        Ok(state.orgs.get(org_id).map(|org| Organization {
            id: org_id.clone(),
            name: org.name.clone(),
        }))
    }

    async fn get_user(
        &self,
        org_id: &OrgId,
        user_id: &UserId,
    ) -> Result<Option<UserDocument>, StoreError> {
        let state = self.inner.state.read().unwrap();
        Ok(state
            .orgs
            .get(org_id)
            .and_then(|org| org.users.get(user_id))
            .cloned())
    }

    fn write_group(&self) -> Box<dyn WriteGroup> {
        Box::new(InMemoryWriteGroup {
            inner: Arc::clone(&self.inner),
            staged: Vec::new(),
        })
    }
}

struct InMemoryWriteGroup {
    inner: Arc<Inner>,
    staged: Vec<(OrgId, UserId, UserUpdate)>,
}

#[async_trait]
impl WriteGroup for InMemoryWriteGroup {
    fn update(
        &mut self,
        org_id: &OrgId,
        user_id: &UserId,
        update: UserUpdate,
    ) -> Result<(), StoreError> {
        if self.staged.len() >= MAX_WRITE_GROUP_SIZE {
            return Err(StoreError::WriteGroupFull);
        }

        self.staged.push((org_id.clone(), user_id.clone(), update));
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut state = self.inner.state.write().unwrap();

        // Validate every target before touching anything, so that a failed
        // commit leaves no partial application behind
        for (org_id, user_id, _) in &self.staged {
            let exists = state
                .orgs
                .get(org_id)
                .is_some_and(|org| org.users.contains_key(user_id));
            if !exists {
                return Err(StoreError::backend(MissingDocument {
                    org_id: org_id.clone(),
                    user_id: user_id.clone(),
                }));
            }
        }

        // Server timestamps resolve to the commit time, not the staging time
        let now = self.inner.clock.now();
        let size = self.staged.len();

        for (org_id, user_id, update) in self.staged {
            let doc = state
                .orgs
                .get_mut(&org_id)
                .and_then(|org| org.users.get_mut(&user_id))
                .expect("validated above");

            if let Some(is_active) = update.is_active {
                doc.is_active = Some(is_active);
            }

            if let Some(updated_at) = update.updated_at {
                doc.updated_at = Some(match updated_at {
                    WriteTimestamp::ServerTime => now,
                    WriteTimestamp::Exact(at) => at,
                });
            }
        }

        drop(state);
        self.inner.commit_log.lock().unwrap().push(size);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use orgops_data_model::MockClock;

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

    fn store_with_clock() -> (InMemoryDocumentStore, Arc<MockClock>) {
        let clock = Arc::new(MockClock::default());
        let store = InMemoryDocumentStore::new(clock.clone());
        (store, clock)
    }

    #[tokio::test]
    async fn test_user_listing_paginates() {
        let (store, _clock) = store_with_clock();
        let org: OrgId = "org1".parse().unwrap();
        for i in 0..5 {
            store.insert_user(user("org1", &format!("u{i}"), None));
        }

        let page = store
            .list_users(&org, Pagination::first(2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next_page);

        let page = store
            .list_users(&org, Pagination::first(2).after(page.next_cursor().unwrap()))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next_page);

        let page = store
            .list_users(&org, Pagination::first(2).after(page.next_cursor().unwrap()))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_write_group_capacity() {
        let (store, _clock) = store_with_clock();
        let org: OrgId = "org1".parse().unwrap();

        let mut group = store.write_group();
        for i in 0..MAX_WRITE_GROUP_SIZE {
            let id: UserId = format!("u{i}").parse().unwrap();
            group.update(&org, &id, UserUpdate::activate()).unwrap();
        }
        assert_eq!(group.len(), MAX_WRITE_GROUP_SIZE);

        let overflow: UserId = "overflow".parse().unwrap();
        let err = group
            .update(&org, &overflow, UserUpdate::activate())
            .unwrap_err();
        assert_matches!(err, StoreError::WriteGroupFull);
    }

    #[tokio::test]
    async fn test_server_timestamp_resolves_at_commit() {
        let (store, clock) = store_with_clock();
        store.insert_user(user("org1", "u1", None));
        let org: OrgId = "org1".parse().unwrap();
        let id: UserId = "u1".parse().unwrap();

        let staged_at = clock.now();
        let mut group = store.write_group();
        group.update(&org, &id, UserUpdate::activate()).unwrap();

        // The clock moves between staging and commit; the document must get
        // the commit time
        clock.advance(Duration::try_minutes(5).unwrap());
        group.commit().await.unwrap();

        let doc = store.get_user(&org, &id).await.unwrap().unwrap();
        assert_eq!(doc.is_active, Some(true));
        assert_eq!(
            doc.updated_at.unwrap(),
            staged_at + Duration::try_minutes(5).unwrap()
        );
    }

    #[tokio::test]
    async fn test_exact_timestamp_is_stored_verbatim() {
        let (store, clock) = store_with_clock();
        store.insert_user(user("org1", "u1", None));
        let org: OrgId = "org1".parse().unwrap();
        let id: UserId = "u1".parse().unwrap();

        let at = clock.now() - Duration::try_days(3).unwrap();
        let mut group = store.write_group();
        group
            .update(
                &org,
                &id,
                UserUpdate {
                    is_active: Some(false),
                    updated_at: Some(WriteTimestamp::Exact(at)),
                },
            )
            .unwrap();

        // An explicit timestamp is not rewritten to the commit time
        clock.advance(Duration::try_minutes(5).unwrap());
        group.commit().await.unwrap();

        let doc = store.get_user(&org, &id).await.unwrap().unwrap();
        assert_eq!(doc.is_active, Some(false));
        assert_eq!(doc.updated_at, Some(at));
    }

    #[tokio::test]
    async fn test_commit_is_atomic() {
        let (store, _clock) = store_with_clock();
        store.insert_user(user("org1", "u1", None));
        let org: OrgId = "org1".parse().unwrap();
        let u1: UserId = "u1".parse().unwrap();
        let ghost: UserId = "ghost".parse().unwrap();

        let mut group = store.write_group();
        group.update(&org, &u1, UserUpdate::activate()).unwrap();
        group.update(&org, &ghost, UserUpdate::activate()).unwrap();

        let err = group.commit().await.unwrap_err();
        assert_matches!(err, StoreError::Backend { .. });

        // The failed commit must not have touched the existing document
        let doc = store.get_user(&org, &u1).await.unwrap().unwrap();
        assert_eq!(doc.is_active, None);
        assert_eq!(doc.updated_at, None);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let (store, _clock) = store_with_clock();
        store.insert_organization(Organization {
            id: "org1".parse().unwrap(),
            name: Some("Acme".to_owned()),
        });
        store.insert_user(user("org1", "u1", None));
        store.insert_user(user("org1", "u2", Some(true)));

        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let parsed: DirectorySnapshot = serde_json::from_str(&json).unwrap();

        let (other, _clock) = store_with_clock();
        other.load_snapshot(parsed);

        let org: OrgId = "org1".parse().unwrap();
        let named = other.get_organization(&org).await.unwrap().unwrap();
        assert_eq!(named.name.as_deref(), Some("Acme"));

        let doc = other
            .get_user(&org, &"u2".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.is_active, Some(true));
    }

    #[tokio::test]
    async fn test_broken_listing_injection() {
        let (store, _clock) = store_with_clock();
        let org: OrgId = "org1".parse().unwrap();
        store.insert_user(user("org1", "u1", None));
        store.break_user_listing(org.clone());

        let err = store
            .list_users(&org, Pagination::first(10))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Backend { .. });
    }
}
