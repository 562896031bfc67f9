// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use sysdict_type::PageNo;

/// The data dictionary header: id counters and the root pages of the boot
/// tables' indexes, all in the system tablespace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictHeader {
	pub row_id: u64,
	pub table_id: u64,
	pub index_id: u64,
	/// SYS_TABLES clustered index.
	pub tables: PageNo,
	/// SYS_TABLES ID_IND.
	pub table_ids: PageNo,
	pub columns: PageNo,
	pub indexes: PageNo,
	pub fields: PageNo,
}
