// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Startup walks over every row of SYS_TABLES.

use std::fmt::Write;

use sysdict_core::{Tuple, system::tables};
use sysdict_type::{Result, SpaceId, TableId};
use tracing::{info, instrument, warn};

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

impl DictGuard<'_> {
	/// Checks the tablespace of every table and publishes the largest
	/// tablespace id in use.
	///
	/// During crash recovery the tablespaces are expected to be open
	/// already; otherwise each single-table file is opened.
	#[instrument(name = "dict::validate_or_store_max_space_id", level = "debug", skip(self))]
	pub fn validate_or_store_max_space_id(&self, in_crash_recovery: bool) -> Result<()> {
		let tablespaces = self.system.tablespaces.as_ref();
		let mut max_space_id = SpaceId::SYSTEM;

		let mut scan = self.scan_clustered(tables::TABLE_ID, Tuple::new(), DeleteMarked::Skip)?;
		loop {
			let (name, space) = match scan.next()? {
				Some(record) => (record.read_str(tables::NAME)?.to_string(), SpaceId(record.read_u32(tables::SPACE)?)),
				None => break,
			};

			if !space.is_system() {
				scan.suspend();
				if in_crash_recovery {
					if !tablespaces.space_for_table_exists_in_mem(space, &name, true) {
						warn!(table = %name, %space, "tablespace of the table was not found during crash recovery");
					}
				} else if !tablespaces.open_single_table_tablespace(space, &name) {
					warn!(table = %name, %space, "tablespace of the table could not be opened");
				}
				scan.resume()?;
			}

			if space > max_space_id {
				max_space_id = space;
			}
		}
		scan.close();

		tablespaces.set_max_space_id_if_bigger(max_space_id);
		info!(%max_space_id, "validated tablespaces of the data dictionary");
		Ok(())
	}

	/// Loads every table and writes its descriptor and constraints to
	/// `out`. A table that cannot be loaded is reported in the output and
	/// skipped.
	#[instrument(name = "dict::print_all_tables", level = "debug", skip_all)]
	pub fn print_all_tables<W: Write>(&mut self, out: &mut W) -> Result<()> {
		let system = self.system;
		let _extension = system.watchdog.extend(system.config.print_wait_extension);

		let mut scan = self.scan_clustered(tables::TABLE_ID, Tuple::new(), DeleteMarked::Skip)?;
		loop {
			let name = match scan.next()? {
				Some(record) => record.read_str(tables::NAME)?.to_string(),
				None => break,
			};

			scan.suspend();
			match self.load_table_id(&name) {
				Ok(Some(id)) => self.print_table(out, id).map_err(CatalogError::from)?,
				Ok(None) => writeln!(out, "failed to load table {}", name).map_err(CatalogError::from)?,
				Err(err) => {
					warn!(table = %name, error = %err, "table failed to load");
					writeln!(out, "failed to load table {}", name).map_err(CatalogError::from)?;
				}
			}
			scan.resume()?;
		}
		scan.close();
		Ok(())
	}

	fn print_table<W: Write>(&self, out: &mut W, id: TableId) -> std::fmt::Result {
		let Some(table) = self.cache.table(id) else {
			return Ok(());
		};
		write!(out, "{}", table)?;
		for foreign_id in table.foreign_list.iter().chain(&table.referenced_list) {
			if let Some(foreign) = self.cache.foreign(foreign_id) {
				writeln!(out, "  {}", foreign)?;
			}
		}
		Ok(())
	}
}
