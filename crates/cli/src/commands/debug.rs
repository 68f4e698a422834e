// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use figment::Figment;
use orgops_config::{ConfigurationSectionExt, EmailConfig};
use orgops_data_model::{OrgId, UserId};
use orgops_identity::DryRunIdentityProvider;
use orgops_tasks::{cleanup_removed_profile, send_activation_reminder};
use tracing::info;

#[derive(Parser, Debug)]
pub(super) struct Options {
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Parser, Debug)]
enum Subcommand {
    /// Send the activation-reminder email to a user of a data file, to check
    /// the email configuration
    SendReminder {
        /// Path to the directory data file
        #[arg(long)]
        data: Utf8PathBuf,

        /// The organization owning the user document
        #[arg(long)]
        org: OrgId,

        /// The user document to remind
        #[arg(long)]
        user: UserId,

        /// Activation link put in the email
        #[arg(long, default_value = "https://example.com/activate")]
        action_url: String,
    },

    /// Delete the identity account behind a profile removed from a data file
    CleanupProfile {
        /// Path to the directory data file
        #[arg(long)]
        data: Utf8PathBuf,

        /// The organization the profile belonged to
        #[arg(long)]
        org: OrgId,

        /// The removed user document
        #[arg(long)]
        user: UserId,
    },
}

impl Options {
    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        use Subcommand as SC;
        match self.subcommand {
            SC::SendReminder {
                data,
                org,
                user,
                action_url,
            } => {
                let config = EmailConfig::extract_or_default(figment).map_err(anyhow::Error::from_boxed)?;
                let mailer = crate::util::mailer_from_config(&config)?;
                mailer
                    .test_connection()
                    .await
                    .context("could not connect to the mail transport")?;

                let store = crate::util::load_store(Some(&data)).await?;
                let outcome =
                    send_activation_reminder(&store, &mailer, &org, &user, &action_url).await?;
                info!(?outcome, "Reminder run finished");
            }

            SC::CleanupProfile { data, org, user } => {
                let store = crate::util::load_store(Some(&data)).await?;
                let identity = DryRunIdentityProvider;
                let outcome = cleanup_removed_profile(&store, &identity, &org, &user).await?;
                info!(?outcome, "Cleanup run finished");
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
