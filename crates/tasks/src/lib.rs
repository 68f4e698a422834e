// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Auxiliary admin operations
//!
//! These are plain async operations invoked by their callers, not queued
//! jobs: each one runs to completion (or error) within the calling request.

#![deny(missing_docs)]

mod cleanup;
mod reminder;

pub use self::{
    cleanup::{CleanupOutcome, cleanup_removed_profile},
    reminder::{ReminderOutcome, send_activation_reminder},
};
