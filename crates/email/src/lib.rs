// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Send emails to users

mod mailer;
mod templates;
mod transport;

pub use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials as SmtpCredentials,
};

pub use self::{
    mailer::{Error as MailerError, Mailer},
    templates::{ReminderContext, ReminderTemplates, TemplateError},
    transport::{Error as TransportError, SmtpMode, Transport as MailTransport},
};
