// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Writes data dictionaries into a [`BufferPool`] the way the server does
//! when it creates tables, so that tests can boot and load from them.

use sysdict_core::{
	Tuple,
	catalog::{IndexDef, IndexType, TableDef, TableType},
	packed::{pack_field_pos, pack_foreign_cols},
	record::{RecordBuilder, RecordLayout},
	system::{FIRST_USER_ID, columns, fields, foreign, foreign_cols, indexes, tables},
};
use sysdict_store::{BufferPool, DictHeader};
use sysdict_type::{IndexId, PageId, PageNo, Result, SpaceId, TableId, internal, return_error};

mod create;

pub use create::{ColumnToCreate, ForeignKeyToCreate, IndexToCreate, TableToCreate};

/// A dictionary in the making. Writes go straight to the pool, so a
/// dictionary booted on the same pool sees them.
#[derive(Debug)]
pub struct TestDictionary {
	pool: BufferPool,
	foreign: Option<(TableDef, TableDef)>,
}

impl TestDictionary {
	/// The boot trees and the header, without a single SYS_TABLES row.
	pub fn empty() -> Result<Self> {
		let pool = BufferPool::new();
		let mut roots = [PageNo::NIL; 5];
		for root in &mut roots {
			*root = pool.allocate_page(SpaceId::SYSTEM).page_no;
		}

		pool.set_dict_header(DictHeader {
			row_id: 0,
			table_id: FIRST_USER_ID,
			index_id: FIRST_USER_ID,
			tables: roots[0],
			table_ids: roots[1],
			columns: roots[2],
			indexes: roots[3],
			fields: roots[4],
		});

		let dictionary = Self {
			pool,
			foreign: None,
		};
		for table in dictionary.boot_tables()? {
			dictionary.create_trees(&table)?;
		}
		Ok(dictionary)
	}

	/// Rows describing the four boot tables, and nothing else.
	pub fn bare() -> Result<Self> {
		let dictionary = Self::empty()?;
		for table in dictionary.boot_tables()? {
			dictionary.write_table(&table)?;
		}
		Ok(dictionary)
	}

	/// The boot tables plus SYS_FOREIGN and SYS_FOREIGN_COLS.
	pub fn new() -> Result<Self> {
		let mut dictionary = Self::bare()?;

		let foreign_id = dictionary.allocate_table_id()?;
		let ids = [dictionary.allocate_index_id()?, dictionary.allocate_index_id()?, dictionary.allocate_index_id()?];
		let roots = [(); 3].map(|_| dictionary.pool.allocate_page(SpaceId::SYSTEM).page_no);
		let sys_foreign = foreign::definition(foreign_id, ids, roots);

		let cols_id = dictionary.allocate_table_id()?;
		let cols_index_id = dictionary.allocate_index_id()?;
		let cols_root = dictionary.pool.allocate_page(SpaceId::SYSTEM).page_no;
		let sys_foreign_cols = foreign_cols::definition(cols_id, cols_index_id, cols_root);

		for table in [&sys_foreign, &sys_foreign_cols] {
			dictionary.create_trees(table)?;
			dictionary.write_table(table)?;
		}
		dictionary.foreign = Some((sys_foreign, sys_foreign_cols));
		Ok(dictionary)
	}

	pub fn pool(&self) -> &BufferPool {
		&self.pool
	}

	pub fn header(&self) -> Result<DictHeader> {
		Ok(self.pool.dict_header()?)
	}

	/// SYS_FOREIGN as written by [`new`](Self::new).
	pub fn sys_foreign(&self) -> Option<&TableDef> {
		self.foreign.as_ref().map(|(table, _)| table)
	}

	pub fn sys_foreign_cols(&self) -> Option<&TableDef> {
		self.foreign.as_ref().map(|(_, table)| table)
	}

	pub fn allocate_table_id(&self) -> Result<TableId> {
		let mut header = self.header()?;
		let id = TableId(header.table_id);
		header.table_id += 1;
		self.pool.set_dict_header(header);
		Ok(id)
	}

	pub fn allocate_index_id(&self) -> Result<IndexId> {
		let mut header = self.header()?;
		let id = IndexId(header.index_id);
		header.index_id += 1;
		self.pool.set_dict_header(header);
		Ok(id)
	}

	/// Builds the descriptor for `to_create` and stores it in the system
	/// tables. User index trees are not created; only their root pages are
	/// reserved.
	pub fn create_table(&self, to_create: TableToCreate) -> Result<TableDef> {
		let id = match to_create.id {
			Some(id) => id,
			None => self.allocate_table_id()?,
		};
		let mut table = TableDef::new(id, &to_create.name, to_create.space, to_create.columns.len());
		if to_create.compact {
			table.flags |= TableDef::FLAG_COMPACT;
		}
		if let Some(table_type) = TableType::from_u32(to_create.table_type) {
			table.table_type = table_type;
		}
		for column in &to_create.columns {
			table.add_column(&column.name, column.mtype, column.prtype, column.len, column.prec);
		}
		table.add_system_columns();

		for index in &to_create.indexes {
			let index_id = match index.id {
				Some(id) => id,
				None => self.allocate_index_id()?,
			};
			let page_no = match index.page_no {
				Some(page_no) => page_no,
				None => self.pool.allocate_page(table.space).page_no,
			};
			let mut def = IndexDef::new(
				index_id,
				&index.name,
				table.id,
				table.space,
				IndexType(index.index_type),
				index.n_fields.unwrap_or(index.fields.len()),
				page_no,
			);
			for (col_name, prefix_len) in &index.fields {
				def.add_field(col_name, *prefix_len);
			}
			table.indexes.push(def);
		}

		self.write_table_rows(&table, to_create.table_type)?;
		Ok(table)
	}

	/// Stores `table` in SYS_TABLES, SYS_COLUMNS, SYS_INDEXES and
	/// SYS_FIELDS.
	pub fn write_table(&self, table: &TableDef) -> Result<()> {
		self.write_table_rows(table, table.table_type.to_u32())
	}

	/// Stores a constraint in SYS_FOREIGN, its two secondary indexes and
	/// SYS_FOREIGN_COLS.
	pub fn add_foreign_key(&self, key: ForeignKeyToCreate) -> Result<()> {
		let Some((sys_foreign, sys_foreign_cols)) = &self.foreign else {
			return_error!(internal!("the dictionary has no foreign key system tables"));
		};

		let clustered = &sys_foreign.indexes[0];
		let layout = clustered.record_layout(sys_foreign)?;
		let n_cols = key.n_cols.unwrap_or(key.columns.len() as u32);
		let row = with_system_columns(&layout)
			.set(foreign::ID, &key.id)
			.set(foreign::FOR_NAME, &key.foreign_table)
			.set(foreign::REF_NAME, &key.referenced_table)
			.set_u32(foreign::N_COLS, pack_foreign_cols(n_cols, key.actions))
			.build()?;
		self.pool.insert(clustered.root(), row)?;

		for (index, name) in [(&sys_foreign.indexes[1], &key.foreign_table), (&sys_foreign.indexes[2], &key.referenced_table)]
		{
			let layout = index.record_layout(sys_foreign)?;
			let row = RecordBuilder::new(&layout)
				.set(foreign::secondary::NAME, name)
				.set(foreign::secondary::ID, &key.id)
				.build()?;
			self.pool.insert(index.root(), row)?;
		}

		let clustered = &sys_foreign_cols.indexes[0];
		let layout = clustered.record_layout(sys_foreign_cols)?;
		for (pos, (for_col, ref_col)) in key.columns.iter().enumerate() {
			let row = with_system_columns(&layout)
				.set(foreign_cols::ID, &key.id)
				.set_u32(foreign_cols::POS, pos as u32)
				.set(foreign_cols::FOR_COL_NAME, for_col)
				.set(foreign_cols::REF_COL_NAME, ref_col)
				.build()?;
			self.pool.insert(clustered.root(), row)?;
		}
		Ok(())
	}

	/// Page of a boot index, picked from the header.
	pub fn system_page(&self, root: impl FnOnce(&DictHeader) -> PageNo) -> Result<PageId> {
		Ok(PageId::new(SpaceId::SYSTEM, root(&self.header()?)))
	}

	pub fn mark_table_deleted(&self, name: &str, deleted: bool) -> Result<()> {
		let page = self.system_page(|h| h.tables)?;
		Ok(self.pool.set_delete_mark(page, &Tuple::single(name), deleted)?)
	}

	pub fn mark_column_deleted(&self, table_id: TableId, pos: u32) -> Result<()> {
		let page = self.system_page(|h| h.columns)?;
		Ok(self.pool.set_delete_mark(page, &column_key(table_id, pos), true)?)
	}

	pub fn mark_index_deleted(&self, table_id: TableId, index_id: IndexId) -> Result<()> {
		let page = self.system_page(|h| h.indexes)?;
		Ok(self.pool.set_delete_mark(page, &index_key(table_id, index_id), true)?)
	}

	/// `pos_word` is the stored SYS_FIELDS.POS, which equals the field
	/// position for indexes without column prefixes.
	pub fn mark_field_deleted(&self, index_id: IndexId, pos_word: u32) -> Result<()> {
		let page = self.system_page(|h| h.fields)?;
		let key = Tuple::single(index_id.to_be_bytes()).with(pos_word.to_be_bytes());
		Ok(self.pool.set_delete_mark(page, &key, true)?)
	}

	pub fn remove_column(&self, table_id: TableId, pos: u32) -> Result<()> {
		let page = self.system_page(|h| h.columns)?;
		self.pool.remove(page, &column_key(table_id, pos))?;
		Ok(())
	}

	/// Overwrites the SYS_INDEXES row of an index, keeping its fields.
	pub fn rewrite_index(&self, index: &IndexDef) -> Result<()> {
		let page = self.system_page(|h| h.indexes)?;
		self.pool.remove(page, &index_key(index.table_id, index.id))?;
		self.write_index_row(index)
	}

	/// Replaces the SYS_FIELDS row stored under `pos_word` with one whose POS
	/// word is `new_word`.
	pub fn rewrite_field_pos(&self, index_id: IndexId, pos_word: u32, new_word: u32, col_name: &str) -> Result<()> {
		let page = self.system_page(|h| h.fields)?;
		self.pool.remove(page, &Tuple::single(index_id.to_be_bytes()).with(pos_word.to_be_bytes()))?;
		let row = with_system_columns(&fields::LAYOUT)
			.set_u64(fields::INDEX_ID, index_id.0)
			.set_u32(fields::POS, new_word)
			.set(fields::COL_NAME, col_name)
			.build()?;
		self.pool.insert(page, row)?;
		Ok(())
	}

	fn boot_tables(&self) -> Result<[TableDef; 4]> {
		let header = self.header()?;
		Ok([
			tables::definition(header.tables, header.table_ids),
			columns::definition(header.columns),
			indexes::definition(header.indexes),
			fields::definition(header.fields),
		])
	}

	fn create_trees(&self, table: &TableDef) -> Result<()> {
		for index in &table.indexes {
			let layout = index.record_layout(table)?;
			self.pool.create_tree(index.root(), layout, index.n_key_fields(table)?)?;
		}
		Ok(())
	}

	fn write_table_rows(&self, table: &TableDef, table_type: u32) -> Result<()> {
		let mut n_cols = table.n_user_cols() as u32;
		if table.is_compact() {
			n_cols |= tables::N_COLS_COMPACT;
		}

		let row = with_system_columns(&tables::LAYOUT)
			.set(tables::NAME, &table.name)
			.set_u64(tables::ID, table.id.0)
			.set_u32(tables::N_COLS, n_cols)
			.set_u32(tables::TYPE, table_type)
			.set_u64(tables::MIX_ID, 0)
			.set_u32(tables::MIX_LEN, table.mix_len);
		let row = match &table.cluster_name {
			Some(cluster_name) => row.set(tables::CLUSTER_NAME, cluster_name),
			None => row.set_null(tables::CLUSTER_NAME),
		};
		self.pool.insert(self.system_page(|h| h.tables)?, row.set_u32(tables::SPACE, table.space.0).build()?)?;

		let row = RecordBuilder::new(&tables::ID_INDEX_LAYOUT)
			.set_u64(tables::id_index::ID, table.id.0)
			.set(tables::id_index::NAME, &table.name)
			.build()?;
		self.pool.insert(self.system_page(|h| h.table_ids)?, row)?;

		let page = self.system_page(|h| h.columns)?;
		for column in table.columns.iter().take(table.n_user_cols()) {
			let row = with_system_columns(&columns::LAYOUT)
				.set_u64(columns::TABLE_ID_FIELD, table.id.0)
				.set_u32(columns::POS, column.pos as u32)
				.set(columns::NAME, &column.name)
				.set_u32(columns::MTYPE, column.mtype.0)
				.set_u32(columns::PRTYPE, column.prtype.0)
				.set_u32(columns::LEN, column.len)
				.set_u32(columns::PREC, column.prec)
				.build()?;
			self.pool.insert(page, row)?;
		}

		for index in &table.indexes {
			self.write_index_row(index)?;
			self.write_field_rows(index)?;
		}
		Ok(())
	}

	fn write_index_row(&self, index: &IndexDef) -> Result<()> {
		let row = with_system_columns(&indexes::LAYOUT)
			.set_u64(indexes::TABLE_ID_FIELD, index.table_id.0)
			.set_u64(indexes::ID, index.id.0)
			.set(indexes::NAME, &index.name)
			.set_u32(indexes::N_FIELDS, index.n_fields as u32)
			.set_u32(indexes::TYPE, index.index_type.0)
			.set_u32(indexes::SPACE, index.space.0)
			.set_u32(indexes::PAGE_NO, index.page_no.0)
			.build()?;
		self.pool.insert(self.system_page(|h| h.indexes)?, row)?;
		Ok(())
	}

	fn write_field_rows(&self, index: &IndexDef) -> Result<()> {
		let page = self.system_page(|h| h.fields)?;
		let has_prefix = index.has_prefix_fields();
		for (pos, field) in index.fields.iter().enumerate() {
			let row = with_system_columns(&fields::LAYOUT)
				.set_u64(fields::INDEX_ID, index.id.0)
				.set_u32(fields::POS, pack_field_pos(pos as u16, field.prefix_len, has_prefix))
				.set(fields::COL_NAME, &field.col_name)
				.build()?;
			self.pool.insert(page, row)?;
		}
		Ok(())
	}
}

/// Starts a row with its hidden system columns zeroed.
fn with_system_columns(layout: &RecordLayout) -> RecordBuilder<'_> {
	let mut builder = RecordBuilder::new(layout);
	for (name, len) in [("DB_ROW_ID", 6), ("DB_TRX_ID", 6), ("DB_ROLL_PTR", 7)] {
		if let Some(pos) = layout.position(name) {
			builder = builder.set(pos, vec![0u8; len]);
		}
	}
	builder
}

fn column_key(table_id: TableId, pos: u32) -> Tuple {
	Tuple::single(table_id.to_be_bytes()).with(pos.to_be_bytes())
}

fn index_key(table_id: TableId, index_id: IndexId) -> Tuple {
	Tuple::single(table_id.to_be_bytes()).with(index_id.to_be_bytes())
}

#[cfg(test)]
mod tests {
	use sysdict_store::{PersistentCursor, SearchMode};

	use super::*;

	fn count(pool: &BufferPool, page: PageId) -> usize {
		pool.pin(page).unwrap().len()
	}

	#[test]
	fn test_empty_has_trees_but_no_rows() {
		let dictionary = TestDictionary::empty().unwrap();
		let tables = dictionary.system_page(|h| h.tables).unwrap();
		assert!(dictionary.pool().contains(tables));
		assert_eq!(count(dictionary.pool(), tables), 0);
	}

	#[test]
	fn test_bare_describes_boot_tables() {
		let dictionary = TestDictionary::bare().unwrap();
		let pool = dictionary.pool();
		assert_eq!(count(pool, dictionary.system_page(|h| h.tables).unwrap()), 4);
		assert_eq!(count(pool, dictionary.system_page(|h| h.table_ids).unwrap()), 4);
		// 8 + 7 + 7 + 3 user columns
		assert_eq!(count(pool, dictionary.system_page(|h| h.columns).unwrap()), 25);
		// CLUST_IND of each plus SYS_TABLES.ID_IND
		assert_eq!(count(pool, dictionary.system_page(|h| h.indexes).unwrap()), 5);
		assert_eq!(count(pool, dictionary.system_page(|h| h.fields).unwrap()), 8);
	}

	#[test]
	fn test_new_adds_foreign_tables() {
		let dictionary = TestDictionary::new().unwrap();
		let sys_foreign = dictionary.sys_foreign().unwrap();
		assert_eq!(sys_foreign.id, TableId(FIRST_USER_ID));
		assert_eq!(dictionary.sys_foreign_cols().unwrap().id, TableId(FIRST_USER_ID + 1));
		assert_eq!(count(dictionary.pool(), dictionary.system_page(|h| h.tables).unwrap()), 6);
		assert_eq!(dictionary.header().unwrap().table_id, FIRST_USER_ID + 2);
		assert_eq!(dictionary.header().unwrap().index_id, FIRST_USER_ID + 4);
	}

	#[test]
	fn test_create_table_rows() {
		let dictionary = TestDictionary::new().unwrap();
		let table = dictionary
			.create_table(
				TableToCreate::new("mydb/t1")
					.id(42)
					.space(17)
					.int_not_null("a")
					.varchar("b", 10)
					.index(IndexToCreate::clustered("PRIMARY", &["a"]).id(100).page_no(5))
					.index(IndexToCreate::secondary("b_idx", &["b"]).id(101).prefix("b", 4)),
			)
			.unwrap();
		assert_eq!(table.n_cols, 5);
		assert_eq!(table.indexes[0].root(), PageId::new(17u32, 5u32));
		assert_eq!(table.indexes[1].page_no, PageNo(8));

		let tables = dictionary.system_page(|h| h.tables).unwrap();
		let cursor =
			PersistentCursor::open_on_user_rec(dictionary.pool(), tables, &Tuple::single("mydb/t1"), SearchMode::GreaterOrEqual)
				.unwrap();
		let record = tables::LAYOUT.decode(cursor.get_rec().unwrap()).unwrap();
		assert_eq!(record.read_str(tables::NAME).unwrap(), "mydb/t1");
		assert_eq!(record.read_u64(tables::ID).unwrap(), 42);
		assert_eq!(record.read_u32(tables::N_COLS).unwrap(), 2);
		assert_eq!(record.read_u32(tables::SPACE).unwrap(), 17);
		assert!(record.is_null(tables::CLUSTER_NAME));

		// the prefixed field is stored as (pos << 16) | prefix
		let fields = dictionary.system_page(|h| h.fields).unwrap();
		let key = Tuple::single(IndexId(101).to_be_bytes()).with(4u32.to_be_bytes());
		assert!(dictionary.pool().pin(fields).unwrap().get(&key.encode()).is_some());
	}

	#[test]
	fn test_foreign_key_rows() {
		let dictionary = TestDictionary::new().unwrap();
		dictionary
			.add_foreign_key(ForeignKeyToCreate::new("mydb/fk1", "mydb/child", "mydb/parent").column("p_id", "id"))
			.unwrap();
		let sys_foreign = dictionary.sys_foreign().unwrap();
		for index in &sys_foreign.indexes {
			assert_eq!(dictionary.pool().pin(index.root()).unwrap().len(), 1);
		}
		let sys_foreign_cols = dictionary.sys_foreign_cols().unwrap();
		assert_eq!(dictionary.pool().pin(sys_foreign_cols.indexes[0].root()).unwrap().len(), 1);
	}

	#[test]
	fn test_foreign_key_needs_foreign_tables() {
		let dictionary = TestDictionary::bare().unwrap();
		let err = dictionary
			.add_foreign_key(ForeignKeyToCreate::new("mydb/fk1", "mydb/child", "mydb/parent"))
			.unwrap_err();
		assert_eq!(err.code(), "INTERNAL_ERROR");
	}
}
