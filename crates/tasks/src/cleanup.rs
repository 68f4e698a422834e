// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use anyhow::Context as _;
use orgops_data_model::{OrgId, UserId};
use orgops_identity::IdentityProvider;
use orgops_storage::DocumentStore;

/// What [`cleanup_removed_profile`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The identity account was deleted
    IdentityDeleted,

    /// The profile document still exists, so nothing was deleted
    SkippedStillPresent,
}

/// Delete the identity account of a user whose profile document was removed
///
/// The removal event may be stale by the time this runs, so the document is
/// checked first: if it still exists, the identity account is left alone.
/// Deleting an identity which is already gone is not an error.
///
/// # Errors
///
/// Returns an error if the document store or the identity provider could not
/// be reached
#[tracing::instrument(
    name = "tasks.cleanup_removed_profile",
    skip_all,
    fields(org.id = %org_id, user.id = %user_id),
)]
pub async fn cleanup_removed_profile(
    store: &dyn DocumentStore,
    identity: &dyn IdentityProvider,
    org_id: &OrgId,
    user_id: &UserId,
) -> Result<CleanupOutcome, anyhow::Error> {
    let document = store
        .get_user(org_id, user_id)
        .await
        .context("failed to look up the profile document")?;

    if document.is_some() {
        tracing::warn!("profile document still exists, skipping identity deletion");
        return Ok(CleanupOutcome::SkippedStillPresent);
    }

    identity
        .delete_account(user_id.as_str())
        .await
        .context("failed to delete the identity account")?;

    tracing::info!("identity account deleted");
    Ok(CleanupOutcome::IdentityDeleted)
}
