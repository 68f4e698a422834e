// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use anyhow::Context as _;
use orgops_data_model::{OrgId, UserId};
use orgops_email::{Mailbox, Mailer, ReminderContext};
use orgops_storage::DocumentStore;

/// What [`send_activation_reminder`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// The reminder email was handed to the transport
    Sent,

    /// The account is already activated
    SkippedAlreadyActive,

    /// The user document has no email address
    SkippedNoEmail,

    /// The user document does not exist
    SkippedMissing,
}

/// Send the activation-reminder email to a user which has not activated yet
///
/// The reminder is only sent when the document exists, is not already
/// activated and carries an email address; anything else is a logged no-op.
///
/// # Errors
///
/// Returns an error if the document store could not be reached, if the stored
/// email address is not a valid mailbox, or if the email failed rendering or
/// sending
#[tracing::instrument(
    name = "tasks.send_activation_reminder",
    skip_all,
    fields(org.id = %org_id, user.id = %user_id),
)]
pub async fn send_activation_reminder(
    store: &dyn DocumentStore,
    mailer: &Mailer,
    org_id: &OrgId,
    user_id: &UserId,
    action_url: &str,
) -> Result<ReminderOutcome, anyhow::Error> {
    let Some(document) = store
        .get_user(org_id, user_id)
        .await
        .context("failed to look up the user document")?
    else {
        tracing::warn!("user document does not exist, not sending a reminder");
        return Ok(ReminderOutcome::SkippedMissing);
    };

    if document.is_active == Some(true) {
        tracing::info!("account is already activated, not sending a reminder");
        return Ok(ReminderOutcome::SkippedAlreadyActive);
    }

    let Some(email) = document.email else {
        tracing::warn!("user document has no email address, not sending a reminder");
        return Ok(ReminderOutcome::SkippedNoEmail);
    };

    let to: Mailbox = email
        .parse()
        .context("stored email address is not a valid mailbox")?;

    let organization = store
        .get_organization(org_id)
        .await
        .context("failed to look up the organization")?;

    let org_name = organization
        .and_then(|org| org.name)
        .unwrap_or_else(|| org_id.to_string());

    let context = ReminderContext {
        org_name,
        display_name: document.display_name,
        action_url: action_url.to_owned(),
    };

    mailer
        .send_reminder_email(to, &context)
        .await
        .context("failed to send the reminder email")?;

    tracing::info!("reminder email sent");
    Ok(ReminderOutcome::Sent)
}
