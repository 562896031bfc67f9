// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_TABLES: one row per table, clustered on NAME, with the secondary
//! index ID_IND on ID.

use once_cell::sync::Lazy;
use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, layout_of, table};
use crate::{
	catalog::{IndexType, TableDef},
	record::RecordLayout,
};

pub const TABLE_NAME: &str = "SYS_TABLES";
pub const TABLE_ID: TableId = TableId(1);
pub const CLUSTERED_INDEX_ID: IndexId = IndexId(1);
pub const ID_INDEX_ID: IndexId = IndexId(5);
pub const ID_INDEX_NAME: &str = "ID_IND";

pub const NAME: usize = 0;
pub const ID: usize = 3;
pub const N_COLS: usize = 4;
pub const TYPE: usize = 5;
pub const MIX_ID: usize = 6;
pub const MIX_LEN: usize = 7;
pub const CLUSTER_NAME: usize = 8;
pub const SPACE: usize = 9;

/// N_COLS carries the compact-format flag in its high bit.
pub const N_COLS_COMPACT: u32 = 0x8000_0000;

pub mod id_index {
	pub const ID: usize = 0;
	pub const NAME: usize = 1;
}

pub fn definition(root: PageNo, id_root: PageNo) -> TableDef {
	let mut table = table(
		TABLE_ID,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[
			("NAME", MainType::BINARY, 0),
			("ID", MainType::BINARY, 0),
			("N_COLS", MainType::INT, 4),
			("TYPE", MainType::INT, 4),
			("MIX_ID", MainType::BINARY, 0),
			("MIX_LEN", MainType::INT, 4),
			("CLUSTER_NAME", MainType::BINARY, 0),
			("SPACE", MainType::INT, 4),
		],
	);
	add_index(&mut table, CLUSTERED_INDEX_ID, "CLUST_IND", CLUSTERED_UNIQUE, root, &["NAME"]);
	add_index(&mut table, ID_INDEX_ID, ID_INDEX_NAME, IndexType::UNIQUE, id_root, &["ID"]);
	table
}

pub static LAYOUT: Lazy<RecordLayout> = Lazy::new(|| layout_of(&definition(PageNo::NIL, PageNo::NIL), 0));

pub static ID_INDEX_LAYOUT: Lazy<RecordLayout> = Lazy::new(|| layout_of(&definition(PageNo::NIL, PageNo::NIL), 1));
