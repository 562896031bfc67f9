// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{Tuple, catalog::TableDef, system::columns};
use sysdict_type::{MainType, PreciseType, Result};
use tracing::error;

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

impl DictGuard<'_> {
	/// Appends the user columns of `table` from SYS_COLUMNS. The rows must
	/// number positions 0 to `n_user_cols - 1` with nothing missing.
	pub(crate) fn load_columns(&self, table: &mut TableDef) -> Result<()> {
		let mut scan =
			self.scan_clustered(columns::TABLE_ID, Tuple::single(table.id.to_be_bytes()), DeleteMarked::Reject)?;

		for i in 0..table.n_user_cols() {
			let Some(record) = scan.next()? else {
				error!(table = %table.name, pos = i, "SYS_COLUMNS ends before the last column of the table");
				return Err(CatalogError::MissingColumnRow {
					table: table.name.clone(),
					pos: i,
				}
				.into());
			};

			let pos = record.read_u32(columns::POS)?;
			if pos as usize != i {
				error!(table = %table.name, expected = i, found = pos, "SYS_COLUMNS row out of sequence");
				return Err(CatalogError::ColumnRowMismatch {
					table: table.name.clone(),
					expected: i,
					found: pos,
				}
				.into());
			}

			let mtype = MainType(record.read_u32(columns::MTYPE)?);
			let prtype = PreciseType(record.read_u32(columns::PRTYPE)?)
				.with_legacy_collation(mtype, self.system.config.default_charset_coll);
			table.add_column(
				record.read_str(columns::NAME)?,
				mtype,
				prtype,
				record.read_u32(columns::LEN)?,
				record.read_u32(columns::PREC)?,
			);
		}

		scan.close();
		Ok(())
	}
}
