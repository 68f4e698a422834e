// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Domain types shared by the orgops crates
//!
//! The directory is a two-level hierarchy: organizations (tenants) each own a
//! collection of user documents. Documents are typed here, with the fields the
//! admin operations care about lifted out of the raw field map and everything
//! else carried through untouched.

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod clock;
mod ids;
mod users;

pub use self::{
    clock::{Clock, MockClock, SystemClock},
    ids::{InvalidIdError, OrgId, UserId},
    users::{Organization, UserDocument, UserUpdate, WriteTimestamp},
};
