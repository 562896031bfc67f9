// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Registry of open tablespaces and the single-table `.ibd` files behind
//! them.

use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use parking_lot::Mutex;
use sysdict_type::SpaceId;
use tracing::{debug, error, warn};

use crate::StoreError;

/// Offset of the space id in the first page of a tablespace file.
pub const SPACE_ID_OFFSET: usize = 38;

/// Space ids from here up are reserved for the redo log.
pub const LOG_SPACE_FIRST_ID: u32 = 0xFFFF_FFF0;

/// Operations the dictionary loader needs from the file subsystem.
pub trait Tablespaces: Send + Sync {
	/// Whether the tablespace `space` is open under `name`. Logs an error
	/// describing the mismatch when `print_error` is set.
	fn space_for_table_exists_in_mem(&self, space: SpaceId, name: &str, print_error: bool) -> bool;

	/// Opens the single-table tablespace file of table `name`, checking
	/// that it carries `space`. Failures are logged and reported as false.
	fn open_single_table_tablespace(&self, space: SpaceId, name: &str) -> bool;

	fn set_max_space_id_if_bigger(&self, max_id: SpaceId);

	fn max_space_id(&self) -> SpaceId;
}

#[derive(Debug, Clone)]
pub struct FilConfig {
	pub data_dir: PathBuf,
	pub extension: String,
}

impl Default for FilConfig {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("."),
			extension: ".ibd".to_string(),
		}
	}
}

impl FilConfig {
	pub fn new(data_dir: impl Into<PathBuf>) -> Self {
		Self {
			data_dir: data_dir.into(),
			..Self::default()
		}
	}

	/// `database/table` lives in `<data_dir>/database/table.ibd`.
	pub fn path_for(&self, name: &str) -> PathBuf {
		self.data_dir.join(format!("{}{}", name, self.extension))
	}
}

#[derive(Debug, Default)]
struct FilInner {
	spaces: HashMap<SpaceId, String>,
	max_space_id: SpaceId,
}

#[derive(Debug)]
pub struct FilSystem {
	config: FilConfig,
	inner: Mutex<FilInner>,
}

impl FilSystem {
	pub fn new(config: FilConfig) -> Self {
		Self {
			config,
			inner: Mutex::new(FilInner::default()),
		}
	}

	pub fn config(&self) -> &FilConfig {
		&self.config
	}

	/// Registers an open tablespace, as crash recovery does for every file
	/// it scans.
	pub fn register(&self, space: SpaceId, name: impl Into<String>) {
		self.inner.lock().spaces.insert(space, name.into());
	}

	pub fn is_open(&self, space: SpaceId) -> bool {
		self.inner.lock().spaces.contains_key(&space)
	}

	fn read_space_id(path: &Path) -> Result<SpaceId, StoreError> {
		let bytes = fs::read(path).map_err(|err| StoreError::TablespaceIo {
			path: path.to_path_buf(),
			reason: err.to_string(),
		})?;
		let id = bytes.get(SPACE_ID_OFFSET..SPACE_ID_OFFSET + 4).ok_or(StoreError::TablespaceTooShort {
			path: path.to_path_buf(),
			len: bytes.len(),
		})?;
		Ok(SpaceId(u32::from_be_bytes([id[0], id[1], id[2], id[3]])))
	}

	fn open(&self, space: SpaceId, name: &str) -> Result<(), StoreError> {
		let path = self.config.path_for(name);
		let found = Self::read_space_id(&path)?;
		if found != space {
			return Err(StoreError::SpaceIdMismatch {
				path,
				expected: space,
				found,
			});
		}
		debug!(%space, name, path = %path.display(), "opened single-table tablespace");
		self.register(space, name);
		Ok(())
	}
}

impl Tablespaces for FilSystem {
	fn space_for_table_exists_in_mem(&self, space: SpaceId, name: &str, print_error: bool) -> bool {
		let inner = self.inner.lock();
		let by_id = inner.spaces.get(&space);
		if by_id.is_some_and(|n| n == name) {
			return true;
		}
		if !print_error {
			return false;
		}

		match by_id {
			None => match inner.spaces.iter().find(|(_, n)| n.as_str() == name) {
				None => error!(
					table = name,
					%space,
					"table has a tablespace id in the data dictionary, but no tablespace with that id or name exists"
				),
				Some((other, _)) => error!(
					table = name,
					%space,
					open_as = %other,
					"a tablespace with the table's name is open under a different id"
				),
			},
			Some(other) => error!(
				table = name,
				%space,
				open_as = %other,
				"the table's tablespace id is open under a different name"
			),
		}
		false
	}

	fn open_single_table_tablespace(&self, space: SpaceId, name: &str) -> bool {
		match self.open(space, name) {
			Ok(()) => true,
			Err(err) => {
				warn!(table = name, %space, error = %err, "could not open single-table tablespace");
				false
			}
		}
	}

	fn set_max_space_id_if_bigger(&self, max_id: SpaceId) {
		if max_id.0 >= LOG_SPACE_FIRST_ID {
			error!(%max_id, "maximum tablespace id is too high");
			return;
		}
		let mut inner = self.inner.lock();
		if inner.max_space_id < max_id {
			inner.max_space_id = max_id;
		}
	}

	fn max_space_id(&self) -> SpaceId {
		self.inner.lock().max_space_id
	}
}
