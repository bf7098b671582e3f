// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod access;
mod logging;

pub use access::{AccessConfig, AccessConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
