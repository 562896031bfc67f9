// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

// #![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use cursor::{PersistentCursor, SearchMode};
pub use error::StoreError;
pub use fil::{FilConfig, FilSystem, Tablespaces};
pub use header::DictHeader;
pub use mtr::Mtr;
pub use pool::BufferPool;
pub use tree::Tree;

mod cursor;
mod error;
pub mod fil;
mod header;
mod mtr;
mod pool;
mod tree;

pub use sysdict_type::{Error, Result};
