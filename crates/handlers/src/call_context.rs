// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use axum::{
    Json,
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use hyper::StatusCode;

use crate::response::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The authorization header is missing
    #[error("Missing authorization header")]
    MissingAuthorizationHeader,

    /// The authorization header is invalid
    #[error("Invalid authorization header")]
    InvalidAuthorizationHeader,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        tracing::debug!(error = &self as &dyn std::error::Error, "Rejected caller");

        let response = ErrorResponse::new("unauthenticated");
        (StatusCode::UNAUTHORIZED, Json(response)).into_response()
    }
}

/// An extractor which requires the caller to present a bearer identity
///
/// The token itself is verified upstream by the gateway terminating the
/// request; this extractor only rejects calls which carry no identity at all.
#[non_exhaustive]
pub struct CallerIdentity {
    pub token: String,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                if e.is_missing() {
                    Rejection::MissingAuthorizationHeader
                } else {
                    Rejection::InvalidAuthorizationHeader
                }
            })?;

        Ok(Self {
            token: token.token().to_owned(),
        })
    }
}
