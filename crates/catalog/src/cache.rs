// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::{BTreeMap, HashMap};

use sysdict_core::{
	SchemaError,
	catalog::{ForeignDef, IndexDef, TableDef},
};
use sysdict_type::{IndexId, Result, TableId, value::data_type::types_are_equal};
use tracing::{debug, error};

use crate::CatalogError;

/// Every table descriptor loaded so far, addressable by id and by name,
/// together with the foreign key constraints between them.
///
/// Descriptors are boxed so that their address stays put for as long as
/// they are cached.
#[derive(Debug, Default)]
pub struct DictCache {
	tables: HashMap<TableId, Box<TableDef>>,
	by_name: HashMap<String, TableId>,
	index_owner: HashMap<IndexId, TableId>,
	foreigns: BTreeMap<String, ForeignDef>,
}

impl DictCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	pub fn table(&self, id: TableId) -> Option<&TableDef> {
		self.tables.get(&id).map(Box::as_ref)
	}

	pub fn table_by_name(&self, name: &str) -> Option<&TableDef> {
		self.by_name.get(name).and_then(|id| self.table(*id))
	}

	pub fn table_id(&self, name: &str) -> Option<TableId> {
		self.by_name.get(name).copied()
	}

	pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
		self.tables.values().map(Box::as_ref)
	}

	pub fn index(&self, id: IndexId) -> Option<&IndexDef> {
		self.index_owner.get(&id).and_then(|table| self.table(*table)).and_then(|table| table.index_by_id(id))
	}

	pub fn foreign(&self, id: &str) -> Option<&ForeignDef> {
		self.foreigns.get(id)
	}

	pub fn foreigns(&self) -> impl Iterator<Item = &ForeignDef> {
		self.foreigns.values()
	}

	/// Caches `table` together with the indexes it already carries.
	///
	/// The hidden system columns are appended when missing; after that the
	/// descriptor must hold exactly `n_cols` columns.
	pub fn add_table(&mut self, mut table: TableDef) -> Result<TableId> {
		table.add_system_columns();
		if table.columns.len() != table.n_cols {
			return Err(SchemaError::IncompleteColumns {
				table: table.name.clone(),
				expected: table.n_cols,
				actual: table.columns.len(),
			}
			.into());
		}
		if self.tables.contains_key(&table.id) {
			return Err(CatalogError::DuplicateTableId {
				table: table.name.clone(),
				id: table.id,
			}
			.into());
		}
		if self.by_name.contains_key(&table.name) {
			return Err(CatalogError::DuplicateTableName {
				name: table.name.clone(),
			}
			.into());
		}

		let id = table.id;
		let indexes = std::mem::take(&mut table.indexes);
		debug!(table = %table.name, %id, n_cols = table.n_cols, "adding table to dictionary cache");
		self.by_name.insert(table.name.clone(), id);
		self.tables.insert(id, Box::new(table));

		for index in indexes {
			if let Err(err) = self.add_index(id, index) {
				self.remove_table(id);
				return Err(err);
			}
		}
		Ok(id)
	}

	/// Appends `index` to its table after binding its fields to the
	/// table's columns.
	pub fn add_index(&mut self, table_id: TableId, mut index: IndexDef) -> Result<()> {
		let table = self.tables.get_mut(&table_id).map(Box::as_mut).ok_or(CatalogError::TableNotCached {
			table_id,
		})?;
		index.resolve_fields(table)?;
		if self.index_owner.contains_key(&index.id) {
			return Err(CatalogError::DuplicateIndexId {
				table: table.name.clone(),
				index: index.name.clone(),
				id: index.id,
			}
			.into());
		}
		if table.indexes.is_empty() && !index.is_clustered() {
			return Err(CatalogError::FirstIndexNotClustered {
				table: table.name.clone(),
				index: index.name.clone(),
			}
			.into());
		}

		self.index_owner.insert(index.id, table_id);
		table.indexes.push(index);
		Ok(())
	}

	/// Drops a table and its indexes from the cache. Constraints where it
	/// is the child go with it; constraints where it is the parent lose
	/// their link to it.
	pub fn remove_table(&mut self, id: TableId) -> Option<Box<TableDef>> {
		let table = self.tables.remove(&id)?;
		self.by_name.remove(&table.name);
		for index in &table.indexes {
			self.index_owner.remove(&index.id);
		}

		for foreign_id in &table.foreign_list {
			let Some(foreign) = self.foreigns.remove(foreign_id) else {
				continue;
			};
			if let Some(parent) = foreign.referenced_table.and_then(|parent| self.tables.get_mut(&parent)) {
				parent.referenced_list.retain(|f| f != foreign_id);
			}
		}

		for foreign_id in &table.referenced_list {
			let Some(foreign) = self.foreigns.get_mut(foreign_id) else {
				continue;
			};
			foreign.referenced_table = None;
			foreign.referenced_index = None;
			if foreign.foreign_table.is_none() {
				self.foreigns.remove(foreign_id);
			}
		}

		debug!(table = %table.name, %id, "removed table from dictionary cache");
		Some(table)
	}

	/// Links `foreign` into the cached tables it names.
	///
	/// When a constraint with the same id is already cached, only its
	/// missing links are filled in and `foreign` itself is dropped. Each
	/// side needs an index whose leading columns are the constraint's
	/// columns; with `check_charsets`, string columns on both sides must
	/// also share a charset.
	pub fn add_foreign(&mut self, foreign: ForeignDef, check_charsets: bool) -> Result<()> {
		let for_table = self.table_id(&foreign.foreign_table_name);
		let ref_table = self.table_id(&foreign.referenced_table_name);
		if for_table.is_none() && ref_table.is_none() {
			return Err(CatalogError::ForeignTablesNotLoaded {
				id: foreign.id.clone(),
			}
			.into());
		}

		let id = foreign.id.clone();
		let is_new = !self.foreigns.contains_key(&id);
		if is_new {
			self.foreigns.insert(id.clone(), foreign);
		}

		let mut linked_parent = None;
		if let Some(ref_table) = ref_table {
			match self.link_referenced(&id, ref_table, check_charsets) {
				Ok(true) => linked_parent = Some(ref_table),
				Ok(false) => {}
				Err(err) => {
					if is_new {
						self.foreigns.remove(&id);
					}
					return Err(err);
				}
			}
		}

		if let Some(for_table) = for_table {
			if let Err(err) = self.link_foreign(&id, for_table, check_charsets) {
				if let Some(parent) = linked_parent {
					self.unlink_referenced(&id, parent);
				}
				if is_new {
					self.foreigns.remove(&id);
				}
				return Err(err);
			}
		}
		Ok(())
	}

	/// Returns whether the parent side was linked by this call.
	fn link_referenced(&mut self, id: &str, table_id: TableId, check_charsets: bool) -> Result<bool> {
		let Some(foreign) = self.foreigns.get(id) else {
			return Ok(false);
		};
		if foreign.referenced_table.is_some() {
			return Ok(false);
		}
		let Some(table) = self.table(table_id) else {
			return Ok(false);
		};

		let types = foreign.foreign_index.and_then(|index| self.index_with_table(index));
		let index = find_index(table, &foreign.referenced_col_names, types, check_charsets)
			.ok_or_else(|| index_not_found(id, table, &foreign.referenced_col_names))?;

		if let Some(foreign) = self.foreigns.get_mut(id) {
			foreign.referenced_table = Some(table_id);
			foreign.referenced_index = Some(index);
		}
		if let Some(table) = self.tables.get_mut(&table_id) {
			table.referenced_list.push(id.to_string());
		}
		Ok(true)
	}

	fn unlink_referenced(&mut self, id: &str, table_id: TableId) {
		if let Some(table) = self.tables.get_mut(&table_id) {
			table.referenced_list.retain(|f| f != id);
		}
		if let Some(foreign) = self.foreigns.get_mut(id) {
			foreign.referenced_table = None;
			foreign.referenced_index = None;
		}
	}

	fn link_foreign(&mut self, id: &str, table_id: TableId, check_charsets: bool) -> Result<()> {
		let Some(foreign) = self.foreigns.get(id) else {
			return Ok(());
		};
		if foreign.foreign_table.is_some() {
			return Ok(());
		}
		let Some(table) = self.table(table_id) else {
			return Ok(());
		};

		let types = foreign.referenced_index.and_then(|index| self.index_with_table(index));
		let index = find_index(table, &foreign.foreign_col_names, types, check_charsets)
			.ok_or_else(|| index_not_found(id, table, &foreign.foreign_col_names))?;

		if let Some(foreign) = self.foreigns.get_mut(id) {
			foreign.foreign_table = Some(table_id);
			foreign.foreign_index = Some(index);
		}
		if let Some(table) = self.tables.get_mut(&table_id) {
			table.foreign_list.push(id.to_string());
		}
		Ok(())
	}

	fn index_with_table(&self, id: IndexId) -> Option<(&TableDef, &IndexDef)> {
		let table = self.index_owner.get(&id).and_then(|table| self.table(*table))?;
		Some((table, table.index_by_id(id)?))
	}
}

fn index_not_found(id: &str, table: &TableDef, columns: &[String]) -> sysdict_type::Error {
	error!(
		constraint = id,
		table = %table.name,
		"no index in the table contains the constraint columns as its first columns"
	);
	CatalogError::ForeignIndexNotFound {
		id: id.to_string(),
		table: table.name.clone(),
		columns: columns.join(", "),
	}
	.into()
}

/// First index of `table` whose leading stored fields are `columns`, in
/// order and compared case-insensitively, without column prefixes. With
/// `types`, each column must also be type-compatible with the field at the
/// same position of that other index.
fn find_index(
	table: &TableDef,
	columns: &[String],
	types: Option<(&TableDef, &IndexDef)>,
	check_charsets: bool,
) -> Option<IndexId> {
	let types_fields = match types {
		Some((types_table, types_index)) => Some((types_table, types_index.internal_fields(types_table).ok()?)),
		None => None,
	};

	table.indexes.iter().find_map(|index| {
		let fields = index.internal_fields(table).ok()?;
		if fields.len() < columns.len() {
			return None;
		}
		for (i, column) in columns.iter().enumerate() {
			let field = &fields[i];
			if field.prefix_len != 0 || !field.col_name.eq_ignore_ascii_case(column) {
				return None;
			}
			if let Some((types_table, types_fields)) = &types_fields {
				let ours = field.col_pos.and_then(|pos| table.columns.get(pos))?;
				let theirs = types_fields.get(i)?.col_pos.and_then(|pos| types_table.columns.get(pos))?;
				if !types_are_equal(ours.data_type(), theirs.data_type(), check_charsets) {
					return None;
				}
			}
		}
		Some(index.id)
	})
}
