// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{process::ExitCode, sync::Arc};

use camino::Utf8PathBuf;
use clap::Parser;
use figment::Figment;
use orgops_backfill::BackfillMigrator;
use tracing::info;

#[derive(Parser, Debug)]
pub(super) struct Options {
    /// Path to the directory data file to migrate
    #[arg(long)]
    data: Utf8PathBuf,

    /// Report what would be updated without writing the data file back
    #[arg(long)]
    dry_run: bool,
}

impl Options {
    pub async fn run(self, _figment: &Figment) -> anyhow::Result<ExitCode> {
        let store = crate::util::load_store(Some(&self.data)).await?;

        let migrator = BackfillMigrator::new(Arc::new(store.clone()));
        let report = migrator.run().await?;
        info!(updated_count = report.updated_count, "Backfill finished");

        if self.dry_run {
            info!("Dry run, not writing the data file back");
        } else {
            crate::util::save_store(&store, &self.data).await?;
        }

        Ok(ExitCode::SUCCESS)
    }
}
