// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod email;
mod http;
mod identity;

pub use self::{
    email::{EmailConfig, EmailSmtpMode, EmailTransportKind},
    http::HttpConfig,
    identity::IdentityConfig,
};
use crate::util::ConfigurationSection;

/// Application configuration root
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RootConfig {
    /// Configuration of the HTTP server
    #[serde(default, skip_serializing_if = "HttpConfig::is_default")]
    pub http: HttpConfig,

    /// Configuration related to sending emails
    #[serde(default, skip_serializing_if = "EmailConfig::is_default")]
    pub email: EmailConfig,

    /// Configuration related to the identity provider
    pub identity: IdentityConfig,
}

impl ConfigurationSection for RootConfig {
    fn validate(
        &self,
        figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.http.validate(figment)?;
        self.email.validate(figment)?;
        self.identity.validate(figment)?;

        Ok(())
    }
}

impl RootConfig {
    /// Generate a new configuration with random secrets
    pub fn generate<R>(mut rng: R) -> Self
    where
        R: Rng + Send,
    {
        Self {
            http: HttpConfig::default(),
            email: EmailConfig::default(),
            identity: IdentityConfig::generate(&mut rng),
        }
    }

    /// Configuration used in tests
    #[must_use]
    pub fn test() -> Self {
        Self {
            http: HttpConfig::default(),
            email: EmailConfig::default(),
            identity: IdentityConfig::test(),
        }
    }
}
