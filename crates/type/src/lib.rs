// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

// #![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod value;

pub use error::{Diagnostic, Error, IntoDiagnostic};
pub use value::{
	data_type::{MainType, PreciseType},
	id::{IndexId, PageId, PageNo, SpaceId, TableId},
};

pub type Result<T> = std::result::Result<T, Error>;
