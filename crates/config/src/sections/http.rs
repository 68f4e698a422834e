// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigurationSection;

const fn default_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
}

fn default_public_base() -> url::Url {
    url::Url::parse("http://localhost:8080/").unwrap()
}

/// Configuration of the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HttpConfig {
    /// Address and port to listen on
    #[serde(default = "default_address")]
    pub address: SocketAddr,

    /// Public URL base used when building absolute URLs, e.g. the activation
    /// link in reminder emails
    #[serde(default = "default_public_base")]
    pub public_base: url::Url,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            public_base: default_public_base(),
        }
    }
}

impl HttpConfig {
    pub(crate) fn is_default(&self) -> bool {
        self.address == default_address() && self.public_base == default_public_base()
    }
}

impl ConfigurationSection for HttpConfig {
    const PATH: Option<&'static str> = Some("http");
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment, Jail,
        providers::{Format, Yaml},
    };

    use super::*;

    #[test]
    fn load_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    http:
                      address: 127.0.0.1:3000
                      public_base: https://admin.example.com/
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<HttpConfig>("http")?;

            assert_eq!(config.address, "127.0.0.1:3000".parse().unwrap());
            assert_eq!(config.public_base.as_str(), "https://admin.example.com/");

            Ok(())
        });
    }
}
