// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Rendering of the outgoing email bodies
//!
//! Only one email is sent by this service, so the templates are embedded in
//! the crate rather than loaded from a template directory.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use thiserror::Error;

const REMINDER_SUBJECT: &str = "reminder.subject.txt";
const REMINDER_TXT: &str = "reminder.txt";

const REMINDER_SUBJECT_SOURCE: &str = "Finish setting up your {{ org_name }} account\n";

const REMINDER_TXT_SOURCE: &str = "\
Hi {% if display_name %}{{ display_name }}{% else %}there{% endif %},

Your {{ org_name }} account is not activated yet. Sign in to finish setting
it up:

    {{ action_url }}

If you did not expect this email, you can safely ignore it.
";

/// Failed to render a template
#[derive(Debug, Error)]
#[error("failed to render email template")]
pub struct TemplateError(#[from] minijinja::Error);

/// Context for the activation-reminder email
#[derive(Debug, Clone, Serialize)]
pub struct ReminderContext {
    /// Name of the organization the account belongs to
    pub org_name: String,

    /// Display name of the recipient, if known
    pub display_name: Option<String>,

    /// Where the recipient should go to activate their account
    pub action_url: String,
}

/// The embedded email templates
#[derive(Clone)]
pub struct ReminderTemplates {
    environment: Environment<'static>,
}

impl ReminderTemplates {
    /// Load the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if a template source fails to parse, which would be a
    /// build defect
    pub fn load() -> Result<Self, TemplateError> {
        let mut environment = Environment::new();
        environment.set_undefined_behavior(UndefinedBehavior::Strict);
        environment.add_template(REMINDER_SUBJECT, REMINDER_SUBJECT_SOURCE)?;
        environment.add_template(REMINDER_TXT, REMINDER_TXT_SOURCE)?;
        Ok(Self { environment })
    }

    /// Render the subject line of the reminder email
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails
    pub fn render_reminder_subject(&self, ctx: &ReminderContext) -> Result<String, TemplateError> {
        let rendered = self.environment.get_template(REMINDER_SUBJECT)?.render(ctx)?;
        Ok(rendered)
    }

    /// Render the plain-text body of the reminder email
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails
    pub fn render_reminder_txt(&self, ctx: &ReminderContext) -> Result<String, TemplateError> {
        let rendered = self.environment.get_template(REMINDER_TXT)?.render(ctx)?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reminder() {
        let templates = ReminderTemplates::load().unwrap();
        let ctx = ReminderContext {
            org_name: "Acme".to_owned(),
            display_name: Some("Alice".to_owned()),
            action_url: "https://acme.example.com/activate".to_owned(),
        };

        let subject = templates.render_reminder_subject(&ctx).unwrap();
        assert_eq!(subject.trim(), "Finish setting up your Acme account");

        let body = templates.render_reminder_txt(&ctx).unwrap();
        assert!(body.contains("Hi Alice,"));
        assert!(body.contains("https://acme.example.com/activate"));
    }

    #[test]
    fn test_render_reminder_without_display_name() {
        let templates = ReminderTemplates::load().unwrap();
        let ctx = ReminderContext {
            org_name: "Acme".to_owned(),
            display_name: None,
            action_url: "https://acme.example.com/activate".to_owned(),
        };

        let body = templates.render_reminder_txt(&ctx).unwrap();
        assert!(body.contains("Hi there,"));
    }
}
