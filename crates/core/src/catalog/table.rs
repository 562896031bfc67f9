// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use sysdict_type::{IndexId, MainType, PreciseType, SpaceId, TableId};

use super::{column::ColumnDef, index::IndexDef};

/// Hidden columns appended after the user columns of every table:
/// `DB_ROW_ID`, `DB_TRX_ID` and `DB_ROLL_PTR`.
pub const N_SYS_COLS: usize = 3;

/// Most fields a record can have, and so the most columns of a table,
/// hidden columns included.
pub const MAX_N_FIELDS: usize = 1023;

/// SYS_TABLES.TYPE.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
	Ordinary,
	ClusterMember,
	Cluster,
}

impl TableType {
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			1 => Some(Self::Ordinary),
			2 => Some(Self::ClusterMember),
			3 => Some(Self::Cluster),
			_ => None,
		}
	}

	pub fn to_u32(self) -> u32 {
		match self {
			Self::Ordinary => 1,
			Self::ClusterMember => 2,
			Self::Cluster => 3,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
	pub id: TableId,
	pub name: String,
	pub space: SpaceId,
	pub flags: u32,
	pub table_type: TableType,
	pub mix_len: u32,
	pub cluster_name: Option<String>,
	/// User columns plus [`N_SYS_COLS`].
	pub n_cols: usize,
	pub columns: Vec<ColumnDef>,
	/// The tablespace file could not be opened. The descriptor stays usable
	/// for dropping the table; reading its data fails.
	pub ibd_file_missing: bool,
	/// The clustered index always comes first.
	pub indexes: Vec<IndexDef>,
	/// Constraint ids where this table is the child.
	pub foreign_list: Vec<String>,
	/// Constraint ids where this table is the parent.
	pub referenced_list: Vec<String>,
}

impl TableDef {
	/// Table rows in the compact record format carry this bit in the high
	/// bit of SYS_TABLES.N_COLS.
	pub const FLAG_COMPACT: u32 = 1;

	pub fn new(id: TableId, name: impl Into<String>, space: SpaceId, n_user_cols: usize) -> Self {
		let n_cols = n_user_cols + N_SYS_COLS;
		Self {
			id,
			name: name.into(),
			space,
			flags: 0,
			table_type: TableType::Ordinary,
			mix_len: 0,
			cluster_name: None,
			n_cols,
			columns: Vec::new(),
			ibd_file_missing: false,
			indexes: Vec::new(),
			foreign_list: Vec::new(),
			referenced_list: Vec::new(),
		}
	}

	pub fn n_user_cols(&self) -> usize {
		self.n_cols - N_SYS_COLS
	}

	pub fn is_compact(&self) -> bool {
		self.flags & Self::FLAG_COMPACT != 0
	}

	/// Tables below the first user id are created by the boot sequence.
	pub fn is_system(&self) -> bool {
		self.id.0 < crate::system::FIRST_USER_ID
	}

	pub fn add_column(&mut self, name: impl Into<String>, mtype: MainType, prtype: PreciseType, len: u32, prec: u32) {
		let pos = self.columns.len();
		self.columns.push(ColumnDef {
			pos,
			name: name.into(),
			mtype,
			prtype,
			len,
			prec,
		});
	}

	/// Appends the hidden system columns once all user columns are present.
	/// Does nothing otherwise.
	pub fn add_system_columns(&mut self) {
		if self.columns.len() != self.n_user_cols() {
			return;
		}
		let not_null = PreciseType::NOT_NULL;
		self.add_column("DB_ROW_ID", MainType::SYS, PreciseType(PreciseType::ROW_ID | not_null), 6, 0);
		self.add_column("DB_TRX_ID", MainType::SYS, PreciseType(PreciseType::TRX_ID | not_null), 6, 0);
		self.add_column("DB_ROLL_PTR", MainType::SYS, PreciseType(PreciseType::ROLL_PTR | not_null), 7, 0);
	}

	pub fn column_pos(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.name == name)
	}

	pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn clustered_index(&self) -> Option<&IndexDef> {
		self.indexes.first().filter(|i| i.is_clustered())
	}

	pub fn index(&self, name: &str) -> Option<&IndexDef> {
		self.indexes.iter().find(|i| i.name == name)
	}

	pub fn index_by_id(&self, id: IndexId) -> Option<&IndexDef> {
		self.indexes.iter().find(|i| i.id == id)
	}

	fn fmt_index(&self, f: &mut Formatter<'_>, index: &IndexDef) -> std::fmt::Result {
		let internal = index.internal_fields(self).unwrap_or_else(|_| index.fields.clone());
		writeln!(
			f,
			"  INDEX: name {}, id {}, fields {}/{}, uniq {}, type {}",
			index.name,
			index.id,
			index.n_fields,
			internal.len(),
			index.n_uniq(),
			index.index_type.0
		)?;
		writeln!(f, "   root page {}", index.page_no)?;
		write!(f, "   FIELDS: ")?;
		for field in &internal {
			if field.prefix_len > 0 {
				write!(f, " {}({})", field.col_name, field.prefix_len)?;
			} else {
				write!(f, " {}", field.col_name)?;
			}
		}
		writeln!(f)
	}
}

impl Display for TableDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "--------------------------------------")?;
		write!(
			f,
			"TABLE: name {}, id {}, space {}, columns {}, indexes {}",
			self.name,
			self.id,
			self.space,
			self.n_cols,
			self.indexes.len()
		)?;
		if self.ibd_file_missing {
			write!(f, ", tablespace file missing")?;
		}
		writeln!(f)?;

		write!(f, "  COLUMNS:")?;
		for column in &self.columns {
			write!(f, " {};", column)?;
		}
		writeln!(f)?;

		for index in &self.indexes {
			self.fmt_index(f, index)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use sysdict_type::PageNo;

	use super::*;
	use crate::catalog::IndexType;

	fn table() -> TableDef {
		let mut table = TableDef::new(TableId(42), "mydb/t1", SpaceId(17), 2);
		table.add_column("a", MainType::INT, PreciseType(3), 4, 0);
		table.add_column("b", MainType::VARMYSQL, PreciseType(15), 10, 0);
		table.add_system_columns();
		table
	}

	#[test]
	fn test_system_columns_appended_last() {
		let table = table();
		assert_eq!(table.n_cols, 5);
		assert_eq!(table.columns.len(), 5);
		assert_eq!(table.columns[2].name, "DB_ROW_ID");
		assert_eq!(table.columns[4].name, "DB_ROLL_PTR");
		assert_eq!(table.columns[4].pos, 4);
		assert!(!table.columns[3].is_nullable());
	}

	#[test]
	fn test_system_columns_added_once() {
		let mut table = table();
		table.add_system_columns();
		assert_eq!(table.columns.len(), 5);

		let mut partial = TableDef::new(TableId(43), "mydb/t2", SpaceId(0), 2);
		partial.add_column("a", MainType::INT, PreciseType(3), 4, 0);
		partial.add_system_columns();
		assert_eq!(partial.columns.len(), 1);
	}

	#[test]
	fn test_is_system() {
		assert!(TableDef::new(TableId(4), "SYS_FIELDS", SpaceId(0), 3).is_system());
		assert!(!TableDef::new(TableId(10), "SYS_FOREIGN", SpaceId(0), 4).is_system());
	}

	#[test]
	fn test_display() {
		let mut table = table();
		let mut index =
			IndexDef::new(IndexId(100), "PRIMARY", TableId(42), SpaceId(17), IndexType(3), 1, PageNo(5));
		index.add_field("a", 0);
		table.indexes.push(index);

		let rendered = table.to_string();
		assert!(rendered.contains("TABLE: name mydb/t1, id 42, space 17, columns 5, indexes 1\n"));
		assert!(rendered.contains("  COLUMNS: a: DATA_INT len 4 prec 0; b: DATA_VARMYSQL len 10 prec 0;"));
		assert!(rendered.contains("  INDEX: name PRIMARY, id 100, fields 1/4, uniq 1, type 3\n"));
		assert!(rendered.contains("   root page 5\n"));
		assert!(rendered.contains("   FIELDS:  a DB_TRX_ID DB_ROLL_PTR b\n"));
	}

	#[test]
	fn test_table_type_codes() {
		for t in [TableType::Ordinary, TableType::ClusterMember, TableType::Cluster] {
			assert_eq!(TableType::from_u32(t.to_u32()), Some(t));
		}
		assert_eq!(TableType::from_u32(0), None);
	}
}
