// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use lettre::{
    AsyncTransport, Message,
    message::{Mailbox, MessageBuilder},
};
use thiserror::Error;

use crate::{
    templates::{ReminderContext, ReminderTemplates, TemplateError},
    transport::Transport,
};

/// Failed to prepare or send an email
#[derive(Debug, Error)]
#[error(transparent)]
pub enum Error {
    /// The template failed to render
    Templates(#[from] TemplateError),

    /// The message could not be assembled
    Content(#[from] lettre::error::Error),

    /// The transport refused the message
    Transport(#[from] crate::transport::Error),
}

/// Helper to send emails out of the service
#[derive(Clone)]
pub struct Mailer {
    templates: ReminderTemplates,
    transport: Transport,
    from: Mailbox,
    reply_to: Mailbox,
}

impl Mailer {
    /// Constructs a new [`Mailer`]
    #[must_use]
    pub fn new(
        templates: ReminderTemplates,
        transport: Transport,
        from: Mailbox,
        reply_to: Mailbox,
    ) -> Self {
        Self {
            templates,
            transport,
            from,
            reply_to,
        }
    }

    fn base_message(&self) -> MessageBuilder {
        Message::builder()
            .from(self.from.clone())
            .reply_to(self.reply_to.clone())
            .message_id(None)
    }

    fn prepare_reminder_email(
        &self,
        to: Mailbox,
        context: &ReminderContext,
    ) -> Result<Message, Error> {
        let subject = self.templates.render_reminder_subject(context)?;
        let body = self.templates.render_reminder_txt(context)?;

        let message = self
            .base_message()
            .subject(subject.trim())
            .to(to)
            .body(body)?;

        Ok(message)
    }

    /// Send the activation-reminder email to a user
    ///
    /// # Errors
    ///
    /// Will return `Err` if the email failed rendering or sending
    #[tracing::instrument(
        name = "email.reminder.send",
        skip_all,
        fields(email.to = %to),
    )]
    pub async fn send_reminder_email(
        &self,
        to: Mailbox,
        context: &ReminderContext,
    ) -> Result<(), Error> {
        let message = self.prepare_reminder_email(to, context)?;
        self.transport.send(message).await?;
        Ok(())
    }

    /// Test the connection to the underlying mail transport
    ///
    /// # Errors
    ///
    /// Will return `Err` if the connection test failed
    pub async fn test_connection(&self) -> Result<(), crate::transport::Error> {
        self.transport.test_connection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_through_blackhole() {
        let templates = ReminderTemplates::load().unwrap();
        let mailer = Mailer::new(
            templates,
            Transport::blackhole(),
            "sender@example.com".parse().unwrap(),
            "reply@example.com".parse().unwrap(),
        );

        let context = ReminderContext {
            org_name: "Acme".to_owned(),
            display_name: None,
            action_url: "https://acme.example.com/activate".to_owned(),
        };

        mailer
            .send_reminder_email("user@example.com".parse().unwrap(), &context)
            .await
            .unwrap();
    }
}
