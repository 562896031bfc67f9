// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Schemas of the system tables and the field positions the loaders read.
//!
//! The four boot tables (SYS_TABLES, SYS_COLUMNS, SYS_INDEXES, SYS_FIELDS)
//! are hard-coded and built in memory at boot. SYS_FOREIGN and
//! SYS_FOREIGN_COLS are ordinary tables described in the boot tables like
//! any user table; their definitions here are what the dictionary writer
//! stores for them.

use sysdict_type::{IndexId, MainType, PageNo, PreciseType, SpaceId, TableId};

use crate::{
	catalog::{IndexDef, IndexType, TableDef},
	record::RecordLayout,
};

pub mod columns;
pub mod fields;
pub mod foreign;
pub mod foreign_cols;
pub mod indexes;
pub mod tables;

/// Table and index ids below this are reserved for the boot tables.
pub const FIRST_USER_ID: u64 = 10;

pub(crate) const CLUSTERED_UNIQUE: u32 = IndexType::CLUSTERED | IndexType::UNIQUE;

pub(crate) fn table(id: TableId, name: &str, space: SpaceId, columns: &[(&str, MainType, u32)]) -> TableDef {
	let mut table = TableDef::new(id, name, space, columns.len());
	for &(name, mtype, len) in columns {
		table.add_column(name, mtype, PreciseType(0), len, 0);
	}
	table.add_system_columns();
	table
}

/// Appends an index over `fields`, which must name columns of `table`.
pub(crate) fn add_index(table: &mut TableDef, id: IndexId, name: &str, index_type: u32, root: PageNo, fields: &[&str]) {
	let mut index = IndexDef::new(id, name, table.id, table.space, IndexType(index_type), fields.len(), root);
	for field in fields {
		index.add_field(*field, 0);
	}
	let resolved = index.resolve_fields(table);
	debug_assert!(resolved.is_ok(), "system index {} names an unknown column", name);
	table.indexes.push(index);
}

pub(crate) fn layout_of(table: &TableDef, index: usize) -> RecordLayout {
	table.indexes[index].record_layout(table).expect("system table definitions are consistent")
}
