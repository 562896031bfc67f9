// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_INDEXES: one row per index, clustered on (TABLE_ID, ID).

use once_cell::sync::Lazy;
use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, layout_of, table};
use crate::{catalog::TableDef, record::RecordLayout};

pub const TABLE_NAME: &str = "SYS_INDEXES";
pub const TABLE_ID: TableId = TableId(3);
pub const CLUSTERED_INDEX_ID: IndexId = IndexId(3);

pub const TABLE_ID_FIELD: usize = 0;
pub const ID: usize = 1;
pub const NAME: usize = 4;
pub const N_FIELDS: usize = 5;
pub const TYPE: usize = 6;
pub const SPACE: usize = 7;
pub const PAGE_NO: usize = 8;

pub fn definition(root: PageNo) -> TableDef {
	let mut table = table(
		TABLE_ID,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[
			("TABLE_ID", MainType::BINARY, 0),
			("ID", MainType::BINARY, 0),
			("NAME", MainType::BINARY, 0),
			("N_FIELDS", MainType::INT, 4),
			("TYPE", MainType::INT, 4),
			("SPACE", MainType::INT, 4),
			("PAGE_NO", MainType::INT, 4),
		],
	);
	add_index(&mut table, CLUSTERED_INDEX_ID, "CLUST_IND", CLUSTERED_UNIQUE, root, &["TABLE_ID", "ID"]);
	table
}

pub static LAYOUT: Lazy<RecordLayout> = Lazy::new(|| layout_of(&definition(PageNo::NIL), 0));
