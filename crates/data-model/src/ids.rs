// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Identifiers for organizations and user documents.
//!
//! Both are opaque, backend-assigned strings. They are only validated enough
//! to be safe to embed in a document path: non-empty and without a path
//! separator.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when parsing an organization or user id
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InvalidIdError {
    /// The id was an empty string
    #[error("id is empty")]
    Empty,

    /// The id contained a path separator
    #[error("id contains a '/'")]
    ContainsSeparator,
}

fn validate(id: &str) -> Result<(), InvalidIdError> {
    if id.is_empty() {
        return Err(InvalidIdError::Empty);
    }

    if id.contains('/') {
        return Err(InvalidIdError::ContainsSeparator);
    }

    Ok(())
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate(s)?;
                Ok(Self(s.to_owned()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// The identifier of an organization, the tenant partition of the
    /// directory
    OrgId
);

id_type!(
    /// The identifier of a user document within an organization
    UserId
);
