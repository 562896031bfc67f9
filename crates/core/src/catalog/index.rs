// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use sysdict_type::{IndexId, PageId, PageNo, SpaceId, TableId};

use super::table::TableDef;
use crate::{
	SchemaError,
	record::{FieldTemplate, RecordLayout},
};

/// Type bits of an index, as stored in SYS_INDEXES.TYPE.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexType(pub u32);

impl IndexType {
	pub const CLUSTERED: u32 = 1;
	pub const UNIQUE: u32 = 2;
	pub const UNIVERSAL: u32 = 4;
	pub const IBUF: u32 = 8;

	pub fn is_clustered(self) -> bool {
		self.0 & Self::CLUSTERED != 0
	}

	pub fn is_unique(self) -> bool {
		self.0 & Self::UNIQUE != 0
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFieldDef {
	pub col_name: String,
	/// Position of the column in its table, set once the index is added to
	/// the dictionary cache.
	pub col_pos: Option<usize>,
	/// Indexed prefix in bytes, 0 for the whole column.
	pub prefix_len: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
	pub id: IndexId,
	pub name: String,
	pub table_id: TableId,
	pub space: SpaceId,
	pub index_type: IndexType,
	pub n_fields: usize,
	pub page_no: PageNo,
	pub fields: Vec<IndexFieldDef>,
}

impl IndexDef {
	pub fn new(
		id: IndexId,
		name: impl Into<String>,
		table_id: TableId,
		space: SpaceId,
		index_type: IndexType,
		n_fields: usize,
		page_no: PageNo,
	) -> Self {
		Self {
			id,
			name: name.into(),
			table_id,
			space,
			index_type,
			n_fields,
			page_no,
			fields: Vec::new(),
		}
	}

	pub fn add_field(&mut self, col_name: impl Into<String>, prefix_len: u16) {
		self.fields.push(IndexFieldDef {
			col_name: col_name.into(),
			col_pos: None,
			prefix_len,
		});
	}

	pub fn is_clustered(&self) -> bool {
		self.index_type.is_clustered()
	}

	pub fn is_unique(&self) -> bool {
		self.index_type.is_unique()
	}

	pub fn root(&self) -> PageId {
		PageId {
			space: self.space,
			page_no: self.page_no,
		}
	}

	pub fn has_prefix_fields(&self) -> bool {
		self.fields.iter().any(|f| f.prefix_len > 0)
	}

	/// Binds every field to the position of its column in `table`.
	pub fn resolve_fields(&mut self, table: &TableDef) -> Result<(), SchemaError> {
		for field in &mut self.fields {
			let pos = table.column_pos(&field.col_name).ok_or_else(|| SchemaError::UnknownColumn {
				table: table.name.clone(),
				index: self.name.clone(),
				column: field.col_name.clone(),
			})?;
			field.col_pos = Some(pos);
		}
		Ok(())
	}

	/// Fields as they are stored in the index records.
	///
	/// A clustered index stores its key fields, `DB_ROW_ID` when the key is
	/// not unique, `DB_TRX_ID` and `DB_ROLL_PTR`, then every user column not
	/// yet stored in full. A secondary index stores its key fields followed
	/// by the unique fields of the clustered index it does not already hold.
	pub fn internal_fields(&self, table: &TableDef) -> Result<Vec<IndexFieldDef>, SchemaError> {
		let mut fields = Vec::with_capacity(table.n_cols + self.fields.len());
		for field in &self.fields {
			fields.push(self.bind(table, &field.col_name, field.prefix_len)?);
		}

		if self.is_clustered() {
			if !self.is_unique() {
				fields.push(self.bind(table, "DB_ROW_ID", 0)?);
			}
			fields.push(self.bind(table, "DB_TRX_ID", 0)?);
			fields.push(self.bind(table, "DB_ROLL_PTR", 0)?);

			for column in table.columns.iter().take(table.n_user_cols()) {
				Self::push_missing(&mut fields, self.bind(table, &column.name, 0)?);
			}
		} else {
			let clustered = table.clustered_index().ok_or_else(|| SchemaError::MissingClusteredIndex {
				table: table.name.clone(),
			})?;
			let clustered_fields = clustered.internal_fields(table)?;
			let n_uniq = clustered.n_uniq();
			for field in clustered_fields.into_iter().take(n_uniq) {
				Self::push_missing(&mut fields, field);
			}
		}

		Ok(fields)
	}

	/// Number of leading stored fields that identify a record in the tree.
	pub fn n_uniq(&self) -> usize {
		if self.is_clustered() && !self.is_unique() {
			self.fields.len() + 1
		} else {
			self.fields.len()
		}
	}

	/// Number of leading stored fields that form the key of a record in the
	/// index tree. A non-unique secondary index needs its appended clustered
	/// key fields to tell duplicates apart.
	pub fn n_key_fields(&self, table: &TableDef) -> Result<usize, SchemaError> {
		if self.is_clustered() || self.is_unique() {
			Ok(self.n_uniq())
		} else {
			Ok(self.internal_fields(table)?.len())
		}
	}

	/// Template for decoding the records of this index.
	pub fn record_layout(&self, table: &TableDef) -> Result<RecordLayout, SchemaError> {
		let templates: Vec<FieldTemplate> = self
			.internal_fields(table)?
			.iter()
			.filter_map(|f| f.col_pos.and_then(|pos| table.columns.get(pos)).map(|c| (c, f.prefix_len)))
			.map(|(column, prefix_len)| column.field_template(prefix_len))
			.collect();
		Ok(RecordLayout::new(templates))
	}

	fn push_missing(fields: &mut Vec<IndexFieldDef>, candidate: IndexFieldDef) {
		let stored = fields.iter().any(|f| f.col_pos == candidate.col_pos && f.prefix_len == 0);
		if !stored {
			fields.push(candidate);
		}
	}

	fn bind(&self, table: &TableDef, col_name: &str, prefix_len: u16) -> Result<IndexFieldDef, SchemaError> {
		let pos = table.column_pos(col_name).ok_or_else(|| SchemaError::UnknownColumn {
			table: table.name.clone(),
			index: self.name.clone(),
			column: col_name.to_string(),
		})?;
		Ok(IndexFieldDef {
			col_name: table.columns[pos].name.clone(),
			col_pos: Some(pos),
			prefix_len,
		})
	}
}

#[cfg(test)]
mod tests {
	use sysdict_type::{MainType, PreciseType};

	use super::*;
	use crate::record::FieldKind;

	fn table() -> TableDef {
		let mut table = TableDef::new(TableId(42), "mydb/t1", SpaceId(17), 3);
		table.add_column("a", MainType::INT, PreciseType(3 | PreciseType::NOT_NULL), 4, 0);
		table.add_column("b", MainType::VARMYSQL, PreciseType(15), 10, 0);
		table.add_column("c", MainType::INT, PreciseType(3), 4, 0);
		table.add_system_columns();
		table
	}

	fn primary(index_type: u32) -> IndexDef {
		let mut index =
			IndexDef::new(IndexId(100), "PRIMARY", TableId(42), SpaceId(17), IndexType(index_type), 1, PageNo(5));
		index.add_field("a", 0);
		index
	}

	fn names(fields: &[IndexFieldDef]) -> Vec<&str> {
		fields.iter().map(|f| f.col_name.as_str()).collect()
	}

	#[test]
	fn test_clustered_unique_internal_fields() {
		let table = table();
		let fields = primary(3).internal_fields(&table).unwrap();
		assert_eq!(names(&fields), vec!["a", "DB_TRX_ID", "DB_ROLL_PTR", "b", "c"]);
		assert_eq!(primary(3).n_uniq(), 1);
	}

	#[test]
	fn test_clustered_non_unique_gets_row_id() {
		let table = table();
		let fields = primary(1).internal_fields(&table).unwrap();
		assert_eq!(names(&fields), vec!["a", "DB_ROW_ID", "DB_TRX_ID", "DB_ROLL_PTR", "b", "c"]);
		assert_eq!(primary(1).n_uniq(), 2);
	}

	#[test]
	fn test_prefix_column_stored_again() {
		let table = table();
		let mut index =
			IndexDef::new(IndexId(100), "PRIMARY", TableId(42), SpaceId(17), IndexType(3), 1, PageNo(5));
		index.add_field("b", 4);
		let fields = index.internal_fields(&table).unwrap();
		assert_eq!(names(&fields), vec!["b", "DB_TRX_ID", "DB_ROLL_PTR", "a", "b", "c"]);

		let layout = index.record_layout(&table).unwrap();
		assert_eq!(layout.fields[0].kind, FieldKind::Variable);
		assert_eq!(layout.fields[3].kind, FieldKind::Fixed(4));
	}

	#[test]
	fn test_secondary_internal_fields() {
		let mut table = table();
		table.indexes.push(primary(3));
		let mut index = IndexDef::new(IndexId(101), "c_idx", TableId(42), SpaceId(17), IndexType(0), 1, PageNo(6));
		index.add_field("c", 0);
		assert_eq!(names(&index.internal_fields(&table).unwrap()), vec!["c", "a"]);
		assert_eq!(index.n_key_fields(&table).unwrap(), 2);

		let mut covering =
			IndexDef::new(IndexId(102), "ca_idx", TableId(42), SpaceId(17), IndexType(0), 2, PageNo(7));
		covering.add_field("c", 0);
		covering.add_field("a", 0);
		assert_eq!(names(&covering.internal_fields(&table).unwrap()), vec!["c", "a"]);
	}

	#[test]
	fn test_secondary_without_clustered() {
		let table = table();
		let mut index = IndexDef::new(IndexId(101), "c_idx", TableId(42), SpaceId(17), IndexType(0), 1, PageNo(6));
		index.add_field("c", 0);
		assert!(matches!(index.internal_fields(&table), Err(SchemaError::MissingClusteredIndex { .. })));
	}

	#[test]
	fn test_layout_templates() {
		let table = table();
		let layout = primary(3).record_layout(&table).unwrap();
		let kinds: Vec<FieldKind> = layout.fields.iter().map(|f| f.kind).collect();
		assert_eq!(
			kinds,
			vec![
				FieldKind::Fixed(4),
				FieldKind::Fixed(6),
				FieldKind::Fixed(7),
				FieldKind::Variable,
				FieldKind::Fixed(4)
			]
		);
		assert!(!layout.fields[0].nullable);
		assert!(layout.fields[3].nullable);
	}

	#[test]
	fn test_resolve_unknown_column() {
		let table = table();
		let mut index = primary(3);
		index.add_field("missing", 0);
		assert!(matches!(
			index.resolve_fields(&table),
			Err(SchemaError::UnknownColumn { column, .. }) if column == "missing"
		));
	}
}
