// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_COLUMNS: one row per user column, clustered on (TABLE_ID, POS).

use once_cell::sync::Lazy;
use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, layout_of, table};
use crate::{catalog::TableDef, record::RecordLayout};

pub const TABLE_NAME: &str = "SYS_COLUMNS";
pub const TABLE_ID: TableId = TableId(2);
pub const CLUSTERED_INDEX_ID: IndexId = IndexId(2);

pub const TABLE_ID_FIELD: usize = 0;
pub const POS: usize = 1;
pub const NAME: usize = 4;
pub const MTYPE: usize = 5;
pub const PRTYPE: usize = 6;
pub const LEN: usize = 7;
pub const PREC: usize = 8;

pub fn definition(root: PageNo) -> TableDef {
	let mut table = table(
		TABLE_ID,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[
			("TABLE_ID", MainType::BINARY, 0),
			("POS", MainType::INT, 4),
			("NAME", MainType::BINARY, 0),
			("MTYPE", MainType::INT, 4),
			("PRTYPE", MainType::INT, 4),
			("LEN", MainType::INT, 4),
			("PREC", MainType::INT, 4),
		],
	);
	add_index(&mut table, CLUSTERED_INDEX_ID, "CLUST_IND", CLUSTERED_UNIQUE, root, &["TABLE_ID", "POS"]);
	table
}

pub static LAYOUT: Lazy<RecordLayout> = Lazy::new(|| layout_of(&definition(PageNo::NIL), 0));
