// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{
	Tuple,
	catalog::{IndexDef, IndexType},
	system::{FIRST_USER_ID, indexes, tables},
};
use sysdict_type::{IndexId, PageNo, Result, SpaceId, TableId};
use tracing::{error, instrument};

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

impl DictGuard<'_> {
	/// Loads the indexes of a boot table that are not built in memory. The
	/// columns of a boot table are never read from SYS_COLUMNS.
	#[instrument(name = "dict::load_sys_table", level = "debug", skip(self))]
	pub fn load_sys_table(&mut self, table_id: TableId) -> Result<()> {
		self.load_indexes(table_id)
	}

	/// Adds every SYS_INDEXES row of the cached table `table_id` to it,
	/// with its fields.
	pub(crate) fn load_indexes(&mut self, table_id: TableId) -> Result<()> {
		let table_name = self.cache.table(table_id).map(|table| table.name.clone()).ok_or(
			CatalogError::TableNotCached {
				table_id,
			},
		)?;
		let mut scan =
			self.scan_clustered(indexes::TABLE_ID, Tuple::single(table_id.to_be_bytes()), DeleteMarked::Reject)?;

		loop {
			let mut index = {
				let Some(record) = scan.next()? else {
					break;
				};
				IndexDef::new(
					IndexId(record.read_u64(indexes::ID)?),
					record.read_str(indexes::NAME)?,
					table_id,
					SpaceId(record.read_u32(indexes::SPACE)?),
					IndexType(record.read_u32(indexes::TYPE)?),
					record.read_u32(indexes::N_FIELDS)? as usize,
					PageNo(record.read_u32(indexes::PAGE_NO)?),
				)
			};

			if index.page_no.is_nil() {
				error!(table = %table_name, index = %index.name, "index tree has been freed");
				return Err(CatalogError::IndexTreeFreed {
					table: table_name,
					index: index.name,
				}
				.into());
			}

			let has_indexes = self.cache.table(table_id).is_some_and(|table| !table.indexes.is_empty());
			if !index.is_clustered() && !has_indexes {
				error!(table = %table_name, index = %index.name, "first index is not clustered");
				return Err(CatalogError::FirstIndexNotClustered {
					table: table_name,
					index: index.name,
				}
				.into());
			}

			if table_id.0 < FIRST_USER_ID
				&& (index.is_clustered() || (table_id == tables::TABLE_ID && index.name == tables::ID_INDEX_NAME))
			{
				// built by the boot sequence
				continue;
			}

			let n_cols = self.cache.table(table_id).map_or(0, |table| table.n_cols);
			if index.n_fields > n_cols {
				error!(
					table = %table_name,
					index = %index.name,
					n_fields = index.n_fields,
					n_cols,
					"SYS_INDEXES field count is out of range"
				);
				return Err(CatalogError::FieldCountOutOfRange {
					table: table_name,
					index: index.name,
					n_fields: index.n_fields,
					n_cols,
				}
				.into());
			}

			self.load_fields(&table_name, &mut index)?;
			self.cache.add_index(table_id, index)?;
		}

		scan.close();
		Ok(())
	}
}
