// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod dictionary;
pub mod tempdir;

pub use dictionary::{ColumnToCreate, ForeignKeyToCreate, IndexToCreate, TableToCreate, TestDictionary};
pub use tempdir::{temp_dir, write_ibd};
