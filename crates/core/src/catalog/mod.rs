// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory descriptors reconstructed from the system tables.

mod column;
mod foreign;
mod index;
mod table;

pub use column::ColumnDef;
pub use foreign::ForeignDef;
pub use index::{IndexDef, IndexFieldDef, IndexType};
pub use table::{MAX_N_FIELDS, N_SYS_COLS, TableDef, TableType};
