// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use async_trait::async_trait;

use crate::{IdentityAccount, IdentityProvider};

/// An identity provider which logs deletions instead of performing them
///
/// Used by local runs where no real identity provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunIdentityProvider;

#[async_trait]
impl IdentityProvider for DryRunIdentityProvider {
    async fn query_account(
        &self,
        _subject: &str,
    ) -> Result<Option<IdentityAccount>, anyhow::Error> {
        Ok(None)
    }

    async fn delete_account(&self, subject: &str) -> Result<(), anyhow::Error> {
        tracing::warn!(subject, "Dry-run identity provider, not deleting the account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deletion_is_a_logged_noop() {
        let provider = DryRunIdentityProvider;
        provider.delete_account("u1").await.unwrap();
        assert_eq!(provider.query_account("u1").await.unwrap(), None);
    }
}
