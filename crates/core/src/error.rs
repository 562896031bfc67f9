// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_type::{Diagnostic, Error, IntoDiagnostic};

/// A stored record does not match the template it is read with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
	#[error("record of {len} bytes is shorter than its {needed} byte header")]
	TooShort {
		len: usize,
		needed: usize,
	},

	#[error("record has {actual} fields, template expects {expected}")]
	FieldCountMismatch {
		expected: usize,
		actual: usize,
	},

	#[error("field {pos} `{field}` is SQL NULL but the column is NOT NULL")]
	NullInNotNullField {
		field: String,
		pos: usize,
	},

	#[error("field {pos} `{field}` has an end offset outside the record body")]
	BadFieldOffset {
		field: String,
		pos: usize,
	},

	#[error("record body is {actual} bytes, fields account for {expected}")]
	TrailingBytes {
		expected: usize,
		actual: usize,
	},

	#[error("field {pos} `{field}` is {actual} bytes, expected {expected}")]
	FieldLength {
		field: String,
		pos: usize,
		expected: usize,
		actual: usize,
	},

	#[error("field {pos} `{field}` is unexpectedly SQL NULL")]
	UnexpectedNull {
		field: String,
		pos: usize,
	},

	#[error("field {pos} `{field}` is not valid UTF-8")]
	InvalidUtf8 {
		field: String,
		pos: usize,
	},

	#[error("field {pos} does not exist in a record of {n_fields} fields")]
	FieldOutOfRange {
		pos: usize,
		n_fields: usize,
	},

	#[error("field {pos} `{field}` has no value")]
	MissingValue {
		field: String,
		pos: usize,
	},

	#[error("field {pos} `{field}` is {len} bytes, longer than a record can hold")]
	FieldTooLong {
		field: String,
		pos: usize,
		len: usize,
	},
}

impl IntoDiagnostic for RecordError {
	fn into_diagnostic(self) -> Diagnostic {
		let code = match &self {
			RecordError::TooShort {
				..
			} => "RECORD_001",
			RecordError::FieldCountMismatch {
				..
			} => "RECORD_002",
			RecordError::NullInNotNullField {
				..
			} => "RECORD_003",
			RecordError::BadFieldOffset {
				..
			} => "RECORD_004",
			RecordError::TrailingBytes {
				..
			} => "RECORD_005",
			RecordError::FieldLength {
				..
			} => "RECORD_006",
			RecordError::UnexpectedNull {
				..
			} => "RECORD_007",
			RecordError::InvalidUtf8 {
				..
			} => "RECORD_008",
			RecordError::FieldOutOfRange {
				..
			} => "RECORD_009",
			RecordError::MissingValue {
				..
			} => "RECORD_010",
			RecordError::FieldTooLong {
				..
			} => "RECORD_011",
		};

		Diagnostic {
			code: code.to_string(),
			message: self.to_string(),
			label: Some("data dictionary corrupt".to_string()),
			help: None,
			notes: vec![],
			cause: None,
		}
	}
}

impl From<RecordError> for Error {
	fn from(err: RecordError) -> Self {
		Error::new(err)
	}
}

/// A descriptor cannot be turned into a record template.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
	#[error("index `{index}` refers to column `{column}` which table `{table}` does not have")]
	UnknownColumn {
		table: String,
		index: String,
		column: String,
	},

	#[error("table `{table}` has no clustered index")]
	MissingClusteredIndex {
		table: String,
	},

	#[error("table `{table}` has {actual} columns loaded, expected {expected}")]
	IncompleteColumns {
		table: String,
		expected: usize,
		actual: usize,
	},
}

impl IntoDiagnostic for SchemaError {
	fn into_diagnostic(self) -> Diagnostic {
		let code = match &self {
			SchemaError::UnknownColumn {
				..
			} => "SCHEMA_001",
			SchemaError::MissingClusteredIndex {
				..
			} => "SCHEMA_002",
			SchemaError::IncompleteColumns {
				..
			} => "SCHEMA_003",
		};

		Diagnostic {
			code: code.to_string(),
			message: self.to_string(),
			label: Some("data dictionary corrupt".to_string()),
			help: None,
			notes: vec![],
			cause: None,
		}
	}
}

impl From<SchemaError> for Error {
	fn from(err: SchemaError) -> Self {
		Error::new(err)
	}
}
