// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrgId, UserId};

/// An organization, the tenant partition of the directory
///
/// Organizations are read-only for the admin operations: they are enumerated,
/// never created or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Backend-assigned identifier of the organization
    pub id: OrgId,

    /// Human-readable name, if the document carries one
    pub name: Option<String>,
}

/// A user document within an organization
///
/// The fields the admin operations read or write are typed; whatever else the
/// document carries rides along in `extra`, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Backend-assigned identifier of the document
    pub id: UserId,

    /// The organization owning this document
    pub org_id: OrgId,

    /// Whether the account is active. `None` on records which predate the
    /// field: those are the ones the backfill targets.
    pub is_active: Option<bool>,

    /// Set to the commit time whenever `is_active` is written
    pub updated_at: Option<DateTime<Utc>>,

    /// Email address, used for the activation reminder
    pub email: Option<String>,

    /// Display name, used in outgoing email
    pub display_name: Option<String>,

    /// All the other fields of the document, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserDocument {
    /// Whether the backfill still has to touch this record
    #[must_use]
    pub fn needs_backfill(&self) -> bool {
        self.is_active.is_none()
    }
}

/// A timestamp value staged in a write
///
/// [`WriteTimestamp::ServerTime`] is an opaque sentinel: the backing store
/// resolves it with its own clock when the write group commits, not when the
/// update is staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTimestamp {
    /// Resolved by the store at commit time
    ServerTime,

    /// An explicit timestamp
    Exact(DateTime<Utc>),
}

/// A partial update to a user document
///
/// Only the fields set to `Some` are written; everything else on the document
/// is left as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New value for `is_active`
    pub is_active: Option<bool>,

    /// New value for `updated_at`
    pub updated_at: Option<WriteTimestamp>,
}

impl UserUpdate {
    /// The update applied by the `is_active` backfill: activate the account
    /// and stamp `updated_at` with the commit time
    #[must_use]
    pub fn activate() -> Self {
        Self {
            is_active: Some(true),
            updated_at: Some(WriteTimestamp::ServerTime),
        }
    }
}
