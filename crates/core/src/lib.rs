// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

// #![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::{RecordError, SchemaError};
pub use key::EncodedKey;
pub use tuple::Tuple;

pub mod catalog;
pub mod encoding;
mod error;
mod key;
pub mod packed;
pub mod record;
pub mod system;
mod tuple;

pub use sysdict_type::{Error, Result};
