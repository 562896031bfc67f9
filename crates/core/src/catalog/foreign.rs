// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use sysdict_type::{IndexId, TableId};

/// A foreign key constraint between a child (`foreign_*`) and a parent
/// (`referenced_*`) table. The links are filled in when the constraint is
/// added to the dictionary cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignDef {
	pub id: String,
	pub foreign_table_name: String,
	pub referenced_table_name: String,
	pub n_fields: usize,
	pub actions: u8,
	pub foreign_col_names: Vec<String>,
	pub referenced_col_names: Vec<String>,
	pub foreign_table: Option<TableId>,
	pub foreign_index: Option<IndexId>,
	pub referenced_table: Option<TableId>,
	pub referenced_index: Option<IndexId>,
}

impl ForeignDef {
	pub const ON_DELETE_CASCADE: u8 = 1;
	pub const ON_DELETE_SET_NULL: u8 = 2;
	pub const ON_UPDATE_CASCADE: u8 = 4;
	pub const ON_UPDATE_SET_NULL: u8 = 8;
	pub const ON_DELETE_NO_ACTION: u8 = 16;
	pub const ON_UPDATE_NO_ACTION: u8 = 32;

	pub fn new(
		id: impl Into<String>,
		foreign_table_name: impl Into<String>,
		referenced_table_name: impl Into<String>,
		n_fields: usize,
		actions: u8,
	) -> Self {
		Self {
			id: id.into(),
			foreign_table_name: foreign_table_name.into(),
			referenced_table_name: referenced_table_name.into(),
			n_fields,
			actions,
			foreign_col_names: Vec::new(),
			referenced_col_names: Vec::new(),
			foreign_table: None,
			foreign_index: None,
			referenced_table: None,
			referenced_index: None,
		}
	}

	pub fn add_column_pair(&mut self, foreign_col: impl Into<String>, referenced_col: impl Into<String>) {
		self.foreign_col_names.push(foreign_col.into());
		self.referenced_col_names.push(referenced_col.into());
	}

	pub fn has_action(&self, action: u8) -> bool {
		self.actions & action != 0
	}
}

impl Display for ForeignDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "FOREIGN KEY CONSTRAINT {}: {} (", self.id, self.foreign_table_name)?;
		for col in &self.foreign_col_names {
			write!(f, " {}", col)?;
		}
		write!(f, " ) REFERENCES {} (", self.referenced_table_name)?;
		for col in &self.referenced_col_names {
			write!(f, " {}", col)?;
		}
		write!(f, " )")
	}
}
