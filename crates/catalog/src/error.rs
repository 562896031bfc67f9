// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_type::{Diagnostic, Error, IndexId, IntoDiagnostic, TableId};

/// Failures of the dictionary loader and cache.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
	#[error("SYS_COLUMNS row for column {expected} of table `{table}` has position {found}")]
	ColumnRowMismatch {
		table: String,
		expected: usize,
		found: u32,
	},

	#[error("SYS_COLUMNS has no row for column {pos} of table `{table}`")]
	MissingColumnRow {
		table: String,
		pos: usize,
	},

	#[error("SYS_FIELDS row for field {pos} of index `{index}` of table `{table}` has a wrong position")]
	FieldRowMismatch {
		table: String,
		index: String,
		pos: usize,
	},

	#[error("SYS_FIELDS has no row for field {pos} of index `{index}` of table `{table}`")]
	MissingFieldRow {
		table: String,
		index: String,
		pos: usize,
	},

	#[error("index `{index}` of table `{table}` has been freed")]
	IndexTreeFreed {
		table: String,
		index: String,
	},

	#[error("first index `{index}` of table `{table}` is not clustered")]
	FirstIndexNotClustered {
		table: String,
		index: String,
	},

	#[error("delete-marked record in index `{index}` of `{table}`")]
	DeleteMarkedRecord {
		table: String,
		index: String,
	},

	#[error("table `{table}` is a cluster member, which is not supported")]
	UnsupportedClusterMember {
		table: String,
	},

	#[error("table `{table}` has unknown type {table_type}")]
	UnknownTableType {
		table: String,
		table_type: u32,
	},

	#[error("cannot cache table `{table}`: id {id} is already in use")]
	DuplicateTableId {
		table: String,
		id: TableId,
	},

	#[error("cannot cache index `{index}` of table `{table}`: id {id} is already in use")]
	DuplicateIndexId {
		table: String,
		index: String,
		id: IndexId,
	},

	#[error("no foreign key system tables in the database")]
	NoForeignKeyTables,

	#[error("foreign key constraint `{id}` has no SYS_FOREIGN row")]
	ForeignNotFound {
		id: String,
	},

	#[error("SYS_FOREIGN_COLS row {pos} of foreign key constraint `{id}` is missing or out of order")]
	ForeignColumnMismatch {
		id: String,
		pos: usize,
	},

	#[error(
		"foreign key constraint `{id}`: table `{table}` has no index whose first columns are ({columns}) with matching types"
	)]
	ForeignIndexNotFound {
		id: String,
		table: String,
		columns: String,
	},

	#[error("neither table of foreign key constraint `{id}` is in the dictionary cache")]
	ForeignTablesNotLoaded {
		id: String,
	},

	#[error("system table {table_id} is not in the dictionary cache")]
	SystemTableMissing {
		table_id: TableId,
	},

	#[error("SYS_FIELDS row for field {pos} of index `{index}` of table `{table}` is delete-marked")]
	DeleteMarkedField {
		table: String,
		index: String,
		pos: usize,
	},

	#[error("cannot cache table `{name}`: a table with that name is already cached")]
	DuplicateTableName {
		name: String,
	},

	#[error("table {table_id} is not in the dictionary cache")]
	TableNotCached {
		table_id: TableId,
	},

	#[error("system table `{table}` has no index `{index}`")]
	SystemIndexMissing {
		table: String,
		index: String,
	},

	#[error("failed to write the table listing")]
	Print,

	#[error("SYS_TABLES gives table `{table}` {n_cols} columns, more than a record can hold")]
	ColumnCountOutOfRange {
		table: String,
		n_cols: usize,
	},

	#[error(
		"SYS_INDEXES gives index `{index}` of table `{table}` {n_fields} fields, but the table has {n_cols} columns"
	)]
	FieldCountOutOfRange {
		table: String,
		index: String,
		n_fields: usize,
		n_cols: usize,
	},
}

impl CatalogError {
	/// Whether the error means the stored dictionary is inconsistent.
	pub fn is_corruption(&self) -> bool {
		matches!(
			self,
			CatalogError::ColumnRowMismatch { .. }
				| CatalogError::MissingColumnRow { .. }
				| CatalogError::FieldRowMismatch { .. }
				| CatalogError::MissingFieldRow { .. }
				| CatalogError::IndexTreeFreed { .. }
				| CatalogError::FirstIndexNotClustered { .. }
				| CatalogError::DeleteMarkedRecord { .. }
				| CatalogError::UnknownTableType { .. }
				| CatalogError::ForeignNotFound { .. }
				| CatalogError::ForeignColumnMismatch { .. }
				| CatalogError::DeleteMarkedField { .. }
				| CatalogError::ColumnCountOutOfRange { .. }
				| CatalogError::FieldCountOutOfRange { .. }
		)
	}

	fn code(&self) -> &'static str {
		match self {
			CatalogError::ColumnRowMismatch {
				..
			} => "DICT_001",
			CatalogError::MissingColumnRow {
				..
			} => "DICT_002",
			CatalogError::FieldRowMismatch {
				..
			} => "DICT_003",
			CatalogError::MissingFieldRow {
				..
			} => "DICT_004",
			CatalogError::IndexTreeFreed {
				..
			} => "DICT_005",
			CatalogError::FirstIndexNotClustered {
				..
			} => "DICT_006",
			CatalogError::DeleteMarkedRecord {
				..
			} => "DICT_007",
			CatalogError::UnsupportedClusterMember {
				..
			} => "DICT_008",
			CatalogError::UnknownTableType {
				..
			} => "DICT_009",
			CatalogError::DuplicateTableId {
				..
			} => "DICT_010",
			CatalogError::DuplicateIndexId {
				..
			} => "DICT_011",
			CatalogError::NoForeignKeyTables => "DICT_012",
			CatalogError::ForeignNotFound {
				..
			} => "DICT_013",
			CatalogError::ForeignColumnMismatch {
				..
			} => "DICT_014",
			CatalogError::ForeignIndexNotFound {
				..
			} => "DICT_015",
			CatalogError::ForeignTablesNotLoaded {
				..
			} => "DICT_016",
			CatalogError::SystemTableMissing {
				..
			} => "DICT_017",
			CatalogError::DeleteMarkedField {
				..
			} => "DICT_018",
			CatalogError::DuplicateTableName {
				..
			} => "DICT_019",
			CatalogError::TableNotCached {
				..
			} => "DICT_020",
			CatalogError::SystemIndexMissing {
				..
			} => "DICT_021",
			CatalogError::Print => "DICT_022",
			CatalogError::ColumnCountOutOfRange {
				..
			} => "DICT_023",
			CatalogError::FieldCountOutOfRange {
				..
			} => "DICT_024",
		}
	}
}

impl IntoDiagnostic for CatalogError {
	fn into_diagnostic(self) -> Diagnostic {
		let label = if self.is_corruption() {
			Some("data dictionary corrupt".to_string())
		} else {
			None
		};
		let help = match &self {
			CatalogError::IndexTreeFreed {
				..
			} => Some("drop the index and create it again"),
			CatalogError::ForeignIndexNotFound {
				..
			} => Some("create an index on the constraint columns, in the constraint's column order"),
			CatalogError::NoForeignKeyTables => Some("the database was created by a server without foreign key support"),
			_ => None,
		};

		Diagnostic {
			code: self.code().to_string(),
			message: self.to_string(),
			label,
			help: help.map(str::to_string),
			notes: vec![],
			cause: None,
		}
	}
}

impl From<CatalogError> for Error {
	fn from(err: CatalogError) -> Self {
		Error::new(err)
	}
}

impl From<std::fmt::Error> for CatalogError {
	fn from(_: std::fmt::Error) -> Self {
		CatalogError::Print
	}
}
