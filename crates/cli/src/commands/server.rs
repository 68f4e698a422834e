// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use figment::Figment;
use orgops_config::{ConfigurationSectionExt, HttpConfig};
use orgops_handlers::AppState;
use tracing::info;

#[derive(Parser, Debug, Default)]
pub(super) struct Options {
    /// Seed the in-memory store from this data file
    ///
    /// The production directory backend is wired by the deployment; local
    /// runs serve the in-memory store.
    #[arg(long)]
    data: Option<Utf8PathBuf>,
}

impl Options {
    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        let http_config = HttpConfig::extract_or_default(figment).map_err(anyhow::Error::from_boxed)?;

        let store = crate::util::load_store(self.data.as_deref()).await?;
        let state = AppState::new(Arc::new(store));
        let router = orgops_handlers::router(state);

        let listener = tokio::net::TcpListener::bind(http_config.address)
            .await
            .with_context(|| format!("could not bind to {}", http_config.address))?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(ExitCode::SUCCESS)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // If we can't listen for the signal, never resolve instead of
            // shutting down immediately
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down");
}
