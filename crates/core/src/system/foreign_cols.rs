// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_FOREIGN_COLS: one row per column pair of a constraint, clustered on
//! (ID, POS).

use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, table};
use crate::catalog::TableDef;

pub const TABLE_NAME: &str = "SYS_FOREIGN_COLS";

pub const ID: usize = 0;
pub const POS: usize = 1;
pub const FOR_COL_NAME: usize = 4;
pub const REF_COL_NAME: usize = 5;

pub fn definition(id: TableId, index_id: IndexId, root: PageNo) -> TableDef {
	let mut table = table(
		id,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[
			("ID", MainType::VARCHAR, 0),
			("POS", MainType::INT, 4),
			("FOR_COL_NAME", MainType::VARCHAR, 0),
			("REF_COL_NAME", MainType::VARCHAR, 0),
		],
	);
	add_index(&mut table, index_id, "ID_IND", CLUSTERED_UNIQUE, root, &["ID", "POS"]);
	table
}
