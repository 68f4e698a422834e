// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::num::NonZeroU16;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::ConfigurationSection;

fn default_email() -> String {
    r#""Admin Operations" <ops@localhost>"#.to_owned()
}

/// What backend should be used when sending emails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailTransportKind {
    /// Don't send emails anywhere
    #[default]
    Blackhole,

    /// Send emails through SMTP
    Smtp,
}

/// Encryption mode to use when sending through SMTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailSmtpMode {
    /// Plain text
    Plain,

    /// `StartTLS`
    StartTls,

    /// TLS
    Tls,
}

/// Configuration related to sending emails
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmailConfig {
    /// Email address to use as the sender
    #[serde(default = "default_email")]
    pub from: String,

    /// Email address to use as the `Reply-To`
    #[serde(default = "default_email")]
    pub reply_to: String,

    /// What backend to use when sending emails
    #[serde(default)]
    pub transport: EmailTransportKind,

    /// Encryption mode, only relevant for the SMTP backend
    pub mode: Option<EmailSmtpMode>,

    /// Hostname to connect to, only relevant for the SMTP backend
    pub hostname: Option<String>,

    /// Port to connect to, defaults to the standard port for the chosen
    /// encryption mode
    pub port: Option<NonZeroU16>,

    /// Username for SMTP authentication
    pub username: Option<String>,

    /// Password for SMTP authentication
    pub password: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: default_email(),
            reply_to: default_email(),
            transport: EmailTransportKind::Blackhole,
            mode: None,
            hostname: None,
            port: None,
            username: None,
            password: None,
        }
    }
}

impl EmailConfig {
    pub(crate) fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

impl ConfigurationSection for EmailConfig {
    const PATH: Option<&'static str> = Some("email");

    fn validate(
        &self,
        _figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        match self.transport {
            EmailTransportKind::Blackhole => {
                if self.mode.is_some()
                    || self.hostname.is_some()
                    || self.port.is_some()
                    || self.username.is_some()
                    || self.password.is_some()
                {
                    return Err(
                        "SMTP fields are only valid with the `smtp` email transport".into(),
                    );
                }
            }

            EmailTransportKind::Smtp => {
                if self.hostname.is_none() {
                    return Err("`hostname` is required with the `smtp` email transport".into());
                }

                if self.mode.is_none() {
                    return Err("`mode` is required with the `smtp` email transport".into());
                }

                if self.username.is_some() != self.password.is_some() {
                    return Err(
                        "`username` and `password` must either both be set or both be absent"
                            .into(),
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment, Jail,
        providers::{Format, Yaml},
    };

    use super::*;

    #[test]
    fn load_smtp_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    email:
                      transport: smtp
                      mode: start_tls
                      hostname: mail.example.com
                      username: ops
                      password: hunter2
                ",
            )?;

            let figment = Figment::new().merge(Yaml::file("config.yaml"));
            let config = EmailConfig::extract(&figment).map_err(|e| e.to_string())?;

            assert_eq!(config.transport, EmailTransportKind::Smtp);
            assert_eq!(config.mode, Some(EmailSmtpMode::StartTls));
            assert_eq!(config.hostname.as_deref(), Some("mail.example.com"));

            Ok(())
        });
    }

    #[test]
    fn smtp_without_hostname_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    email:
                      transport: smtp
                      mode: tls
                ",
            )?;

            let figment = Figment::new().merge(Yaml::file("config.yaml"));
            assert!(EmailConfig::extract(&figment).is_err());

            Ok(())
        });
    }
}
