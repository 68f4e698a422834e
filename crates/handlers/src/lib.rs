// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! HTTP surface of the service
//!
//! Two routes trigger the same `is_active` backfill: an authenticated admin
//! route, and an unauthenticated route kept for callers which cannot attach
//! an identity. Both wrap one migrator over the store handle held in the app
//! state.

use std::sync::Arc;

use axum::{Router, routing::post};
use orgops_backfill::BackfillMigrator;
use orgops_storage::BoxDocumentStore;
use tower_http::cors::CorsLayer;

mod admin;
mod call_context;
mod public;
mod response;

pub use self::call_context::CallerIdentity;

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    store: BoxDocumentStore,
}

impl AppState {
    /// Construct the state around a store handle
    #[must_use]
    pub fn new(store: BoxDocumentStore) -> Self {
        Self { store }
    }

    fn migrator(&self) -> BackfillMigrator {
        BackfillMigrator::new(Arc::clone(&self.store))
    }
}

/// Build the application router
#[must_use]
pub fn router(state: AppState) -> Router {
    // The public trigger is callable from browsers on any origin
    let public = Router::new()
        .route("/migrations/backfill-active", post(public::post))
        .layer(CorsLayer::permissive());

    Router::new()
        .route(
            "/api/admin/v1/migrations/backfill-active",
            post(admin::post),
        )
        .merge(public)
        .with_state(state)
}
