// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use sysdict_store::fil::SPACE_ID_OFFSET;
use uuid::Uuid;

pub fn temp_dir<F>(f: F) -> std::io::Result<()>
where
	F: FnOnce(&Path) -> std::io::Result<()>,
{
	let mut path = env::temp_dir();
	path.push(format!("sysdict-{}", Uuid::new_v4()));

	fs::create_dir(&path)?;
	let result = f(&path);
	let _ = fs::remove_dir_all(&path);
	result
}

/// Writes a minimal single-table tablespace file for table `name` whose
/// first page carries `space`.
pub fn write_ibd(dir: &Path, name: &str, space: u32) -> std::io::Result<PathBuf> {
	let path = dir.join(format!("{}.ibd", name));
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	let mut page = vec![0u8; 2 * SPACE_ID_OFFSET];
	page[SPACE_ID_OFFSET..SPACE_ID_OFFSET + 4].copy_from_slice(&space.to_be_bytes());
	fs::write(&path, page)?;
	Ok(path)
}
