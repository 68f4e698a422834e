// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Interface to the identity-provider account store
//!
//! The identity provider holds the authentication accounts backing the user
//! documents in the directory. It is an external collaborator: this crate
//! only defines the connection trait the admin operations consume, plus a
//! mock implementation for tests and a dry-run one for local runs.

mod dry_run;
mod mock;

use async_trait::async_trait;

pub use self::{dry_run::DryRunIdentityProvider, mock::MockIdentityProvider};

/// An authentication account held by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    /// The subject identifier of the account
    pub subject: String,

    /// Email address registered with the account, if any
    pub email: Option<String>,

    /// Whether the account is disabled
    pub disabled: bool,
}

/// A connection to the identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Query an account by its subject identifier
    ///
    /// Returns `None` if no account exists for that subject
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider could not be reached
    async fn query_account(&self, subject: &str) -> Result<Option<IdentityAccount>, anyhow::Error>;

    /// Permanently delete an account
    ///
    /// Deleting an account which does not exist is not an error: the
    /// operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider could not be reached or
    /// refused the deletion
    async fn delete_account(&self, subject: &str) -> Result<(), anyhow::Error>;
}
