// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use hyper::StatusCode;

use crate::{
    AppState,
    response::{BackfillResponse, ErrorResponse},
};

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Migration(#[from] orgops_backfill::Error),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        tracing::error!(
            error = &self as &dyn std::error::Error,
            "Backfill migration failed"
        );

        let response = ErrorResponse::new(self.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
    }
}

/// The unauthenticated HTTP trigger for the `is_active` backfill
#[tracing::instrument(name = "handlers.public.backfill_active", skip_all)]
pub async fn post(State(state): State<AppState>) -> Result<Json<BackfillResponse>, RouteError> {
    let report = state.migrator().run().await?;
    Ok(Json(report.into()))
}
