// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use sysdict_type::{MainType, PreciseType};

use crate::record::FieldTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub pos: usize,
	pub name: String,
	pub mtype: MainType,
	pub prtype: PreciseType,
	pub len: u32,
	pub prec: u32,
}

impl ColumnDef {
	pub fn is_nullable(&self) -> bool {
		!self.prtype.is_not_null()
	}

	/// The `(mtype, prtype, len)` triple compared when matching foreign key
	/// columns.
	pub fn data_type(&self) -> (MainType, PreciseType, u32) {
		(self.mtype, self.prtype, self.len)
	}

	/// Template of this column as an index field; a column prefix is always
	/// stored with a variable length.
	pub fn field_template(&self, prefix_len: u16) -> FieldTemplate {
		let template = match self.mtype.fixed_size(self.len) {
			Some(size) if size > 0 && prefix_len == 0 => FieldTemplate::fixed(self.name.clone(), size),
			_ => FieldTemplate::variable(self.name.clone()),
		};
		if self.is_nullable() {
			template
		} else {
			template.not_null()
		}
	}
}

impl Display for ColumnDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {} len {} prec {}", self.name, self.mtype, self.len, self.prec)
	}
}
