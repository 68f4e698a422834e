// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::sync::Arc;

use anyhow::Context;
use camino::Utf8Path;
use orgops_config::{EmailConfig, EmailSmtpMode, EmailTransportKind};
use orgops_data_model::SystemClock;
use orgops_email::{MailTransport, Mailer, ReminderTemplates, SmtpCredentials, SmtpMode};
use orgops_storage_mem::{DirectorySnapshot, InMemoryDocumentStore};

pub fn mailer_from_config(config: &EmailConfig) -> Result<Mailer, anyhow::Error> {
    let transport = match config.transport {
        EmailTransportKind::Blackhole => MailTransport::blackhole(),

        EmailTransportKind::Smtp => {
            let hostname = config
                .hostname
                .as_deref()
                .context("invalid SMTP configuration: missing hostname")?;

            let mode = match config
                .mode
                .context("invalid SMTP configuration: missing mode")?
            {
                EmailSmtpMode::Plain => SmtpMode::Plain,
                EmailSmtpMode::StartTls => SmtpMode::StartTls,
                EmailSmtpMode::Tls => SmtpMode::Tls,
            };

            let credentials = match (config.username.clone(), config.password.clone()) {
                (Some(username), Some(password)) => Some(SmtpCredentials::new(username, password)),
                (None, None) => None,
                _ => anyhow::bail!(
                    "invalid SMTP configuration: username and password must come together"
                ),
            };

            MailTransport::smtp(mode, hostname, config.port, credentials)
                .context("failed to build the SMTP transport")?
        }
    };

    let templates = ReminderTemplates::load().context("failed to load the email templates")?;
    let from = config.from.parse().context("invalid sender address")?;
    let reply_to = config.reply_to.parse().context("invalid reply-to address")?;

    Ok(Mailer::new(templates, transport, from, reply_to))
}

/// Build an in-memory store, optionally seeded from a data file
pub async fn load_store(data: Option<&Utf8Path>) -> Result<InMemoryDocumentStore, anyhow::Error> {
    let store = InMemoryDocumentStore::new(Arc::new(SystemClock::default()));

    if let Some(path) = data {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("could not read data file {path:?}"))?;
        let snapshot: DirectorySnapshot = serde_json::from_slice(&raw)
            .with_context(|| format!("could not parse data file {path:?}"))?;
        store.load_snapshot(snapshot);
    }

    Ok(store)
}

/// Persist the store back to a data file
pub async fn save_store(store: &InMemoryDocumentStore, path: &Utf8Path) -> Result<(), anyhow::Error> {
    let raw = serde_json::to_vec_pretty(&store.snapshot())?;
    tokio::fs::write(path, raw)
        .await
        .with_context(|| format!("could not write data file {path:?}"))?;

    Ok(())
}
