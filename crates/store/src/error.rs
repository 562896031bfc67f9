// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use sysdict_core::{EncodedKey, RecordError};
use sysdict_type::{Diagnostic, Error, IntoDiagnostic, PageId, SpaceId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
	#[error("no index tree has its root at page {page}")]
	PageNotFound {
		page: PageId,
	},

	#[error("page {page} already holds an index tree")]
	PageInUse {
		page: PageId,
	},

	#[error("a record with key {key:?} already exists")]
	DuplicateKey {
		key: EncodedKey,
	},

	#[error("no record with key {key:?} in the tree at page {page}")]
	RecordNotFound {
		page: PageId,
		key: EncodedKey,
	},

	#[error("cursor has no stored position to restore")]
	NoStoredPosition,

	#[error("the data dictionary header has not been written")]
	NoDictHeader,

	#[error(transparent)]
	Record(#[from] RecordError),

	#[error("cannot read tablespace file {path}: {reason}")]
	TablespaceIo {
		path: PathBuf,
		reason: String,
	},

	#[error("tablespace file {path} is only {len} bytes")]
	TablespaceTooShort {
		path: PathBuf,
		len: usize,
	},

	#[error("tablespace id in file {path} is {found}, but the data dictionary says {expected}")]
	SpaceIdMismatch {
		path: PathBuf,
		expected: SpaceId,
		found: SpaceId,
	},
}

impl IntoDiagnostic for StoreError {
	fn into_diagnostic(self) -> Diagnostic {
		let (code, help) = match &self {
			StoreError::Record(err) => return err.clone().into_diagnostic(),
			StoreError::PageNotFound {
				..
			} => ("STORE_001", None),
			StoreError::PageInUse {
				..
			} => ("STORE_002", None),
			StoreError::DuplicateKey {
				..
			} => ("STORE_003", None),
			StoreError::RecordNotFound {
				..
			} => ("STORE_004", None),
			StoreError::NoStoredPosition => ("STORE_005", None),
			StoreError::NoDictHeader => ("STORE_006", Some("the system tablespace was not initialised")),
			StoreError::TablespaceIo {
				..
			} => ("FIL_001", Some("check that the .ibd file exists and is readable")),
			StoreError::TablespaceTooShort {
				..
			} => ("FIL_002", None),
			StoreError::SpaceIdMismatch {
				..
			} => ("FIL_003", Some("the .ibd file may have been copied from another server")),
		};

		Diagnostic {
			code: code.to_string(),
			message: self.to_string(),
			label: None,
			help: help.map(str::to_string),
			notes: vec![],
			cause: None,
		}
	}
}

impl From<StoreError> for Error {
	fn from(err: StoreError) -> Self {
		Error::new(err)
	}
}
