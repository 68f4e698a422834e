// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use rand::{
    Rng,
    distributions::{Alphanumeric, DistString},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigurationSection;

fn default_endpoint() -> Url {
    Url::parse("http://localhost:8081/").unwrap()
}

/// Configuration related to the identity provider
///
/// The API key is deliberately a configuration value: it must come from the
/// config file or the environment, never from the source tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentityConfig {
    /// The base URL of the identity provider's admin API
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// API key to use for calls to the admin API
    pub api_key: String,
}

impl ConfigurationSection for IdentityConfig {
    const PATH: Option<&'static str> = Some("identity");
}

impl IdentityConfig {
    pub(crate) fn generate<R>(mut rng: R) -> Self
    where
        R: Rng + Send,
    {
        Self {
            endpoint: default_endpoint(),
            api_key: Alphanumeric.sample_string(&mut rng, 32),
        }
    }

    pub(crate) fn test() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: "test".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment, Jail,
        providers::{Env, Format, Yaml},
    };

    use super::*;

    #[test]
    fn load_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    identity:
                      endpoint: https://idp.example.com/
                      api_key: secret-from-config
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<IdentityConfig>("identity")?;

            assert_eq!(config.endpoint.as_str(), "https://idp.example.com/");
            assert_eq!(&config.api_key, "secret-from-config");

            Ok(())
        });
    }

    #[test]
    fn environment_overrides_api_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    identity:
                      api_key: from-file
                ",
            )?;
            jail.set_env("ORGOPS_IDENTITY__API_KEY", "from-env");

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .merge(Env::prefixed("ORGOPS_").split("__"))
                .extract_inner::<IdentityConfig>("identity")?;

            assert_eq!(&config.api_key, "from-env");

            Ok(())
        });
    }
}
