// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

mod config;
mod debug;
mod migrate;
mod server;

#[derive(Parser, Debug)]
#[command(name = "orgops", version, about = "Admin operations for the user directory")]
pub struct Options {
    /// Path to the configuration file
    #[arg(short, long, global = true, action = clap::ArgAction::Append)]
    config: Vec<Utf8PathBuf>,

    #[command(subcommand)]
    subcommand: Option<Subcommand>,
}

#[derive(Parser, Debug)]
enum Subcommand {
    /// Configuration-related commands
    Config(self::config::Options),

    /// Debug utilities
    Debug(self::debug::Options),

    /// Run the `is_active` backfill once over a data file
    Migrate(self::migrate::Options),

    /// Run the HTTP server
    Server(self::server::Options),
}

impl Options {
    pub fn figment(&self) -> Figment {
        let configs = if self.config.is_empty() {
            vec![Utf8PathBuf::from("config.yaml")]
        } else {
            self.config.clone()
        };

        let mut figment = Figment::new();
        for path in configs {
            figment = figment.merge(Yaml::file(path));
        }

        figment.merge(Env::prefixed("ORGOPS_").split("__"))
    }

    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        use Subcommand as S;
        match self.subcommand {
            Some(S::Config(c)) => c.run(figment).await,
            Some(S::Debug(c)) => c.run(figment).await,
            Some(S::Migrate(c)) => c.run(figment).await,
            Some(S::Server(c)) => c.run(figment).await,

            // Run the server by default
            None => self::server::Options::default().run(figment).await,
        }
    }
}
