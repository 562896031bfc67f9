// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{
	Tuple,
	catalog::ForeignDef,
	packed::unpack_foreign_cols,
	system::{foreign, foreign_cols},
};
use sysdict_type::{Result, TableId};
use tracing::{debug, error, instrument, warn};

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

impl DictGuard<'_> {
	/// Loads every constraint in which table `table_name` is the child or
	/// the parent, and the other table of each constraint.
	#[instrument(name = "dict::load_foreign_keys", level = "debug", skip(self))]
	pub fn load_foreign_keys(&mut self, table_name: &str) -> Result<()> {
		if self.load_foreign_keys_if_present(table_name)? {
			Ok(())
		} else {
			Err(CatalogError::NoForeignKeyTables.into())
		}
	}

	/// Returns false when the database has no SYS_FOREIGN table.
	pub(crate) fn load_foreign_keys_if_present(&mut self, table_name: &str) -> Result<bool> {
		let Some(sys_foreign) = self.load_table_id(foreign::TABLE_NAME)? else {
			return Ok(false);
		};

		// child side first, then parent side
		for index_name in [foreign::FOR_INDEX_NAME, foreign::REF_INDEX_NAME] {
			let mut scan = self.scan_index(sys_foreign, index_name, Tuple::single(table_name), DeleteMarked::Skip)?;
			loop {
				let id = match scan.next()? {
					Some(record) => record.read_str(foreign::secondary::ID)?.to_string(),
					None => break,
				};

				scan.suspend();
				self.load_foreign(sys_foreign, &id)?;
				scan.resume()?;
			}
			scan.close();
		}
		Ok(true)
	}

	fn load_foreign(&mut self, sys_foreign: TableId, id: &str) -> Result<()> {
		let mut scan = self.scan_clustered(sys_foreign, Tuple::single(id), DeleteMarked::Skip)?;
		let row = match scan.next()? {
			Some(record) => Some((
				record.read_str(foreign::FOR_NAME)?.to_string(),
				record.read_str(foreign::REF_NAME)?.to_string(),
				record.read_u32(foreign::N_COLS)?,
			)),
			None => None,
		};
		scan.close();
		let Some((foreign_table, referenced_table, word)) = row else {
			error!(constraint = id, "SYS_FOREIGN has no row for the constraint");
			return Err(CatalogError::ForeignNotFound {
				id: id.to_string(),
			}
			.into());
		};

		let (n_fields, actions) = unpack_foreign_cols(word);
		let mut constraint = ForeignDef::new(id, foreign_table, referenced_table, n_fields as usize, actions);
		self.load_foreign_cols(&mut constraint)?;

		for name in [constraint.foreign_table_name.clone(), constraint.referenced_table_name.clone()] {
			match self.load_table_id(&name) {
				Ok(Some(_)) => {}
				Ok(None) => {
					warn!(constraint = id, table = %name, "table of foreign key constraint does not exist")
				}
				Err(err) if self.system.config.strict_foreign_keys => return Err(err),
				Err(err) => {
					warn!(constraint = id, table = %name, error = %err, "table of foreign key constraint failed to load")
				}
			}
		}

		debug!(constraint = id, "adding foreign key constraint to the cache");
		self.cache.add_foreign(constraint, true)
	}

	fn load_foreign_cols(&mut self, constraint: &mut ForeignDef) -> Result<()> {
		let Some(sys_foreign_cols) = self.load_table_id(foreign_cols::TABLE_NAME)? else {
			return Err(CatalogError::NoForeignKeyTables.into());
		};

		let mut scan =
			self.scan_clustered(sys_foreign_cols, Tuple::single(constraint.id.as_str()), DeleteMarked::Reject)?;
		for i in 0..constraint.n_fields {
			let columns = match scan.next()? {
				Some(record) if record.read_u32(foreign_cols::POS).is_ok_and(|pos| pos as usize == i) => Some((
					record.read_str(foreign_cols::FOR_COL_NAME)?.to_string(),
					record.read_str(foreign_cols::REF_COL_NAME)?.to_string(),
				)),
				_ => None,
			};
			let Some((foreign_col, referenced_col)) = columns else {
				error!(constraint = %constraint.id, pos = i, "SYS_FOREIGN_COLS row missing or out of sequence");
				return Err(CatalogError::ForeignColumnMismatch {
					id: constraint.id.clone(),
					pos: i,
				}
				.into());
			};
			constraint.add_column_pair(foreign_col, referenced_col);
		}

		scan.close();
		Ok(())
	}
}
