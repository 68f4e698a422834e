// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! # `is_active` backfill
//!
//! This crate provides the engine for the one-off migration adding the
//! `is_active` field to every user document of every organization.
//!
//! The engine visits the two-level hierarchy sequentially: organizations in
//! listing order, then each organization's user documents, partitioned into
//! write groups of at most 500 operations so that no atomic commit exceeds
//! the backend's limit. Only documents still missing the field are staged,
//! which makes a run idempotent: a second pass over an already-migrated
//! directory commits nothing.
//!
//! This crate does not implement any retry logic: a failed run is safe to
//! re-invoke from scratch precisely because of that idempotence.

#![deny(clippy::future_not_send, missing_docs)]

mod migration;

pub use self::migration::{BackfillMigrator, BackfillReport, Error};
