// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Application configuration logic

#![deny(missing_docs)]

mod sections;
mod util;

pub use self::{
    sections::{
        EmailConfig, EmailSmtpMode, EmailTransportKind, HttpConfig, IdentityConfig, RootConfig,
    },
    util::{ConfigurationSection, ConfigurationSectionExt},
};
