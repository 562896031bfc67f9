// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_FOREIGN: one row per foreign key constraint, clustered on ID, with
//! secondary indexes on the child (FOR_IND) and parent (REF_IND) names.

use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, table};
use crate::catalog::TableDef;

pub const TABLE_NAME: &str = "SYS_FOREIGN";
pub const FOR_INDEX_NAME: &str = "FOR_IND";
pub const REF_INDEX_NAME: &str = "REF_IND";

pub const ID: usize = 0;
pub const FOR_NAME: usize = 3;
pub const REF_NAME: usize = 4;
pub const N_COLS: usize = 5;

/// Field positions in FOR_IND and REF_IND records.
pub mod secondary {
	pub const NAME: usize = 0;
	pub const ID: usize = 1;
}

/// `index_ids` and `roots` are in index order: ID_IND, FOR_IND, REF_IND.
pub fn definition(id: TableId, index_ids: [IndexId; 3], roots: [PageNo; 3]) -> TableDef {
	let mut table = table(
		id,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[
			("ID", MainType::VARCHAR, 0),
			("FOR_NAME", MainType::VARCHAR, 0),
			("REF_NAME", MainType::VARCHAR, 0),
			("N_COLS", MainType::INT, 4),
		],
	);
	add_index(&mut table, index_ids[0], "ID_IND", CLUSTERED_UNIQUE, roots[0], &["ID"]);
	add_index(&mut table, index_ids[1], FOR_INDEX_NAME, 0, roots[1], &["FOR_NAME"]);
	add_index(&mut table, index_ids[2], REF_INDEX_NAME, 0, roots[2], &["REF_NAME"]);
	table
}
