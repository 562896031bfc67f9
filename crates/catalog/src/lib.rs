// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

// #![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(not(debug_assertions), deny(warnings))]
// #![cfg_attr(not(debug_assertions), deny(clippy::unwrap_used))]
// #![cfg_attr(not(debug_assertions), deny(clippy::expect_used))]

pub use cache::DictCache;
pub use config::DictConfig;
pub use error::CatalogError;
pub use scan::{DeleteMarked, PrefixScan};
pub use system::{DictGuard, DictSystem};
pub use watchdog::{SemaphoreWatchdog, WatchdogExtension};

mod boot;
mod cache;
mod config;
mod error;
mod load;
pub mod scan;
mod system;
mod watchdog;

pub use sysdict_type::{Error, Result};
