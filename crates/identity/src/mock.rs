// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{IdentityAccount, IdentityProvider};

/// A mock identity provider, keeping its accounts in memory
///
/// Deletions are recorded so tests can assert on them.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<BTreeMap<String, IdentityAccount>>,
    deleted: Mutex<BTreeSet<String>>,
}

impl MockIdentityProvider {
    /// Create an empty mock provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account
    ///
    /// # Panics
    ///
    /// Panics if the account lock is poisoned.
    pub fn insert_account(&self, account: IdentityAccount) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.subject.clone(), account);
    }

    /// The subjects deleted so far, in subject order
    ///
    /// # Panics
    ///
    /// Panics if the deletion lock is poisoned.
    #[must_use]
    pub fn deleted_subjects(&self) -> Vec<String> {
        self.deleted.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn query_account(&self, subject: &str) -> Result<Option<IdentityAccount>, anyhow::Error> {
        Ok(self.accounts.lock().unwrap().get(subject).cloned())
    }

    async fn delete_account(&self, subject: &str) -> Result<(), anyhow::Error> {
        self.accounts.lock().unwrap().remove(subject);
        self.deleted.lock().unwrap().insert(subject.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let provider = MockIdentityProvider::new();
        provider.insert_account(IdentityAccount {
            subject: "u1".to_owned(),
            email: None,
            disabled: false,
        });

        provider.delete_account("u1").await.unwrap();
        assert_eq!(provider.query_account("u1").await.unwrap(), None);

        // Deleting again must not fail
        provider.delete_account("u1").await.unwrap();
        assert_eq!(provider.deleted_subjects(), vec!["u1".to_owned()]);
    }
}
