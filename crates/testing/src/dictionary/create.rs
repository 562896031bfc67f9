// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::catalog::{ForeignDef, IndexType};
use sysdict_type::{IndexId, MainType, PageNo, PreciseType, SpaceId, TableId};

/// MySQL type code of `INT` in the low byte of the precise type.
const MYSQL_TYPE_LONG: u32 = 3;
/// MySQL type code of `VARCHAR`.
const MYSQL_TYPE_VARCHAR: u32 = 15;
/// latin1_swedish_ci
const DEFAULT_CHARSET_COLL: u32 = 8;

#[derive(Debug, Clone)]
pub struct ColumnToCreate {
	pub name: String,
	pub mtype: MainType,
	pub prtype: PreciseType,
	pub len: u32,
	pub prec: u32,
}

#[derive(Debug, Clone)]
pub struct IndexToCreate {
	pub name: String,
	pub id: Option<IndexId>,
	pub index_type: u32,
	pub fields: Vec<(String, u16)>,
	pub page_no: Option<PageNo>,
	/// Overrides the stored N_FIELDS, which otherwise equals the number of
	/// fields.
	pub n_fields: Option<usize>,
}

impl IndexToCreate {
	pub fn new(name: impl Into<String>, index_type: u32, fields: &[&str]) -> Self {
		Self {
			name: name.into(),
			id: None,
			index_type,
			fields: fields.iter().map(|f| (f.to_string(), 0)).collect(),
			page_no: None,
			n_fields: None,
		}
	}

	pub fn clustered(name: impl Into<String>, fields: &[&str]) -> Self {
		Self::new(name, IndexType::CLUSTERED | IndexType::UNIQUE, fields)
	}

	pub fn secondary(name: impl Into<String>, fields: &[&str]) -> Self {
		Self::new(name, 0, fields)
	}

	pub fn unique(name: impl Into<String>, fields: &[&str]) -> Self {
		Self::new(name, IndexType::UNIQUE, fields)
	}

	pub fn id(mut self, id: u64) -> Self {
		self.id = Some(IndexId(id));
		self
	}

	pub fn page_no(mut self, page_no: u32) -> Self {
		self.page_no = Some(PageNo(page_no));
		self
	}

	pub fn n_fields(mut self, n_fields: usize) -> Self {
		self.n_fields = Some(n_fields);
		self
	}

	/// Indexes only the first `prefix_len` bytes of `column`.
	pub fn prefix(mut self, column: &str, prefix_len: u16) -> Self {
		for field in &mut self.fields {
			if field.0 == column {
				field.1 = prefix_len;
			}
		}
		self
	}
}

#[derive(Debug, Clone)]
pub struct TableToCreate {
	pub name: String,
	pub id: Option<TableId>,
	pub space: SpaceId,
	pub compact: bool,
	/// Raw SYS_TABLES.TYPE.
	pub table_type: u32,
	pub columns: Vec<ColumnToCreate>,
	pub indexes: Vec<IndexToCreate>,
}

impl TableToCreate {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			id: None,
			space: SpaceId::SYSTEM,
			compact: false,
			table_type: 1,
			columns: Vec::new(),
			indexes: Vec::new(),
		}
	}

	pub fn id(mut self, id: u64) -> Self {
		self.id = Some(TableId(id));
		self
	}

	pub fn space(mut self, space: u32) -> Self {
		self.space = SpaceId(space);
		self
	}

	pub fn compact(mut self) -> Self {
		self.compact = true;
		self
	}

	pub fn table_type(mut self, table_type: u32) -> Self {
		self.table_type = table_type;
		self
	}

	pub fn column(mut self, name: impl Into<String>, mtype: MainType, prtype: PreciseType, len: u32) -> Self {
		self.columns.push(ColumnToCreate {
			name: name.into(),
			mtype,
			prtype,
			len,
			prec: 0,
		});
		self
	}

	pub fn int(self, name: impl Into<String>) -> Self {
		self.column(name, MainType::INT, PreciseType(MYSQL_TYPE_LONG), 4)
	}

	pub fn int_not_null(self, name: impl Into<String>) -> Self {
		self.column(name, MainType::INT, PreciseType(MYSQL_TYPE_LONG | PreciseType::NOT_NULL), 4)
	}

	pub fn varchar(self, name: impl Into<String>, len: u32) -> Self {
		let prtype = PreciseType(MYSQL_TYPE_VARCHAR).with_charset_coll(DEFAULT_CHARSET_COLL);
		self.column(name, MainType::VARMYSQL, prtype, len)
	}

	pub fn index(mut self, index: IndexToCreate) -> Self {
		self.indexes.push(index);
		self
	}
}

#[derive(Debug, Clone)]
pub struct ForeignKeyToCreate {
	pub id: String,
	pub foreign_table: String,
	pub referenced_table: String,
	/// `(child column, parent column)` pairs.
	pub columns: Vec<(String, String)>,
	pub actions: u8,
	/// Overrides the stored field count.
	pub n_cols: Option<u32>,
}

impl ForeignKeyToCreate {
	pub fn new(id: impl Into<String>, foreign_table: impl Into<String>, referenced_table: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			foreign_table: foreign_table.into(),
			referenced_table: referenced_table.into(),
			columns: Vec::new(),
			actions: 0,
			n_cols: None,
		}
	}

	pub fn column(mut self, foreign_col: impl Into<String>, referenced_col: impl Into<String>) -> Self {
		self.columns.push((foreign_col.into(), referenced_col.into()));
		self
	}

	pub fn on_delete_cascade(mut self) -> Self {
		self.actions |= ForeignDef::ON_DELETE_CASCADE;
		self
	}

	pub fn actions(mut self, actions: u8) -> Self {
		self.actions = actions;
		self
	}

	pub fn n_cols(mut self, n_cols: u32) -> Self {
		self.n_cols = Some(n_cols);
		self
	}
}
