// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{
	Tuple,
	catalog::{MAX_N_FIELDS, N_SYS_COLS, TableDef, TableType},
	record::Record,
	system::tables,
};
use sysdict_store::{PersistentCursor, SearchMode};
use sysdict_type::{Result, SpaceId, TableId};
use tracing::{debug, error, instrument, warn};

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

/// The fields of a SYS_TABLES row the loader uses.
struct TableRow {
	name: String,
	id: TableId,
	n_cols: u32,
	table_type: u32,
	mix_len: u32,
	cluster_name: Option<String>,
	space: SpaceId,
}

impl TableRow {
	fn decode(record: &Record<'_>) -> Result<Self> {
		let cluster_name = if record.is_null(tables::CLUSTER_NAME) {
			None
		} else {
			Some(record.read_str(tables::CLUSTER_NAME)?.to_string())
		};
		Ok(Self {
			name: record.read_str(tables::NAME)?.to_string(),
			id: TableId(record.read_u64(tables::ID)?),
			n_cols: record.read_u32(tables::N_COLS)?,
			table_type: record.read_u32(tables::TYPE)?,
			mix_len: record.read_u32(tables::MIX_LEN)?,
			cluster_name,
			space: SpaceId(record.read_u32(tables::SPACE)?),
		})
	}
}

impl DictGuard<'_> {
	/// Returns the descriptor of table `name`, loading it into the cache
	/// first when needed. A table without a live SYS_TABLES row is `None`.
	///
	/// A table whose tablespace file cannot be opened is still returned,
	/// flagged with `ibd_file_missing`.
	#[instrument(name = "dict::load_table", level = "debug", skip(self))]
	pub fn load_table(&mut self, name: &str) -> Result<Option<&TableDef>> {
		let id = self.load_table_id(name)?;
		Ok(id.and_then(|id| self.cache.table(id)))
	}

	/// Looks `id` up in SYS_TABLES.ID_IND and loads the table by its name.
	#[instrument(name = "dict::load_table_on_id", level = "debug", skip(self))]
	pub fn load_table_on_id(&mut self, id: TableId) -> Result<Option<&TableDef>> {
		if self.cache.table(id).is_none() {
			let name = {
				let mut scan = self.scan_index(
					tables::TABLE_ID,
					tables::ID_INDEX_NAME,
					Tuple::single(id.to_be_bytes()),
					DeleteMarked::Skip,
				)?;
				let name = match scan.next()? {
					Some(record) => Some(record.read_str(tables::id_index::NAME)?.to_string()),
					None => None,
				};
				scan.close();
				name
			};
			let Some(name) = name else {
				debug!(%id, "no table with this id");
				return Ok(None);
			};
			let loaded = self.load_table_id(&name)?;
			return Ok(loaded.and_then(|id| self.cache.table(id)));
		}
		Ok(self.cache.table(id))
	}

	/// Name of the first live table whose name starts with `db_prefix`, in
	/// name order.
	pub fn get_first_table_name_in_db(&self, db_prefix: &str) -> Result<Option<String>> {
		let table = self.cache.table(tables::TABLE_ID).ok_or(CatalogError::SystemTableMissing {
			table_id: tables::TABLE_ID,
		})?;
		let index = table.clustered_index().ok_or_else(|| CatalogError::SystemIndexMissing {
			table: table.name.clone(),
			index: "CLUST_IND".to_string(),
		})?;
		let layout = index.record_layout(table)?;
		let mut cursor = PersistentCursor::open_on_user_rec(
			&self.system.pool,
			index.root(),
			&Tuple::single(db_prefix),
			SearchMode::GreaterOrEqual,
		)?;

		let name = loop {
			let Some(bytes) = cursor.get_rec() else {
				break None;
			};
			let record = layout.decode(bytes)?;
			let name = record.read_str(tables::NAME)?;
			if !name.starts_with(db_prefix) {
				break None;
			}
			if !record.is_deleted() {
				break Some(name.to_string());
			}
			cursor.move_to_next_user_rec();
		};
		cursor.close();
		Ok(name)
	}

	/// Cache-first load by name, returning the id of the cached table.
	pub(crate) fn load_table_id(&mut self, name: &str) -> Result<Option<TableId>> {
		if let Some(id) = self.cache.table_id(name) {
			return Ok(Some(id));
		}

		let row = {
			let mut scan = self.scan_clustered(tables::TABLE_ID, Tuple::single(name), DeleteMarked::Skip)?;
			let row = match scan.next()? {
				Some(record) => Some(TableRow::decode(&record)?),
				None => None,
			};
			scan.close();
			row
		};
		let Some(row) = row else {
			debug!(table = name, "no live SYS_TABLES row");
			return Ok(None);
		};

		let table = self.table_from_row(row)?;
		let id = self.cache.add_table(table)?;

		if let Err(err) = self.load_indexes(id) {
			self.cache.remove_table(id);
			return Err(err);
		}

		match self.load_foreign_keys_if_present(name) {
			Ok(true) => {}
			Ok(false) => warn!(table = name, "no foreign key system tables in the database"),
			Err(err) if self.system.config.strict_foreign_keys => {
				error!(table = name, error = %err, "foreign key constraints of the table failed to load");
				self.cache.remove_table(id);
				return Err(err);
			}
			Err(err) => warn!(table = name, error = %err, "foreign key constraints of the table failed to load"),
		}

		debug!(table = name, %id, "loaded table");
		Ok(Some(id))
	}

	fn table_from_row(&self, row: TableRow) -> Result<TableDef> {
		let Some(table_type) = TableType::from_u32(row.table_type) else {
			error!(table = %row.name, table_type = row.table_type, "unknown table type in SYS_TABLES");
			return Err(CatalogError::UnknownTableType {
				table: row.name,
				table_type: row.table_type,
			}
			.into());
		};
		if table_type == TableType::ClusterMember {
			error!(table = %row.name, "table is a cluster member");
			return Err(CatalogError::UnsupportedClusterMember {
				table: row.name,
			}
			.into());
		}

		let n_user_cols = (row.n_cols & !tables::N_COLS_COMPACT) as usize;
		if n_user_cols > MAX_N_FIELDS - N_SYS_COLS {
			error!(table = %row.name, n_cols = n_user_cols, "SYS_TABLES column count is out of range");
			return Err(CatalogError::ColumnCountOutOfRange {
				table: row.name,
				n_cols: n_user_cols,
			}
			.into());
		}
		let mut table = TableDef::new(row.id, row.name, row.space, n_user_cols);
		if row.n_cols & tables::N_COLS_COMPACT != 0 {
			table.flags |= TableDef::FLAG_COMPACT;
		}
		table.table_type = table_type;
		table.mix_len = row.mix_len;
		table.cluster_name = row.cluster_name;

		if !table.space.is_system() {
			let tablespaces = self.system.tablespaces.as_ref();
			if !tablespaces.space_for_table_exists_in_mem(table.space, &table.name, false)
				&& !tablespaces.open_single_table_tablespace(table.space, &table.name)
			{
				warn!(
					table = %table.name,
					space = %table.space,
					"tablespace of the table is missing; the table can only be dropped"
				);
				table.ibd_file_missing = true;
			}
		}

		self.load_columns(&mut table)?;
		Ok(table)
	}
}
