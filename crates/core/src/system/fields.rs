// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SYS_FIELDS: one row per index field, clustered on (INDEX_ID, POS). POS is
//! a packed word, see [`crate::packed::unpack_field_pos`].

use once_cell::sync::Lazy;
use sysdict_type::{IndexId, MainType, PageNo, SpaceId, TableId};

use super::{CLUSTERED_UNIQUE, add_index, layout_of, table};
use crate::{catalog::TableDef, record::RecordLayout};

pub const TABLE_NAME: &str = "SYS_FIELDS";
pub const TABLE_ID: TableId = TableId(4);
pub const CLUSTERED_INDEX_ID: IndexId = IndexId(4);

pub const INDEX_ID: usize = 0;
pub const POS: usize = 1;
pub const COL_NAME: usize = 4;

pub fn definition(root: PageNo) -> TableDef {
	let mut table = table(
		TABLE_ID,
		TABLE_NAME,
		SpaceId::SYSTEM,
		&[("INDEX_ID", MainType::BINARY, 0), ("POS", MainType::INT, 4), ("COL_NAME", MainType::BINARY, 0)],
	);
	add_index(&mut table, CLUSTERED_INDEX_ID, "CLUST_IND", CLUSTERED_UNIQUE, root, &["INDEX_ID", "POS"]);
	table
}

pub static LAYOUT: Lazy<RecordLayout> = Lazy::new(|| layout_of(&definition(PageNo::NIL), 0));
