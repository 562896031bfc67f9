// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{Tuple, catalog::IndexDef, packed::unpack_field_pos, system::fields};
use sysdict_type::Result;
use tracing::error;

use crate::{CatalogError, DictGuard, scan::DeleteMarked};

impl DictGuard<'_> {
	/// Appends the `n_fields` fields of `index` from SYS_FIELDS.
	pub(crate) fn load_fields(&self, table_name: &str, index: &mut IndexDef) -> Result<()> {
		let mut scan =
			self.scan_clustered(fields::TABLE_ID, Tuple::single(index.id.to_be_bytes()), DeleteMarked::Include)?;

		for i in 0..index.n_fields {
			let Some(record) = scan.next()? else {
				error!(table = table_name, index = %index.name, field = i, "SYS_FIELDS ends before the last field of the index");
				return Err(CatalogError::MissingFieldRow {
					table: table_name.to_string(),
					index: index.name.clone(),
					pos: i,
				}
				.into());
			};

			if record.is_deleted() {
				error!(table = table_name, index = %index.name, field = i, "delete-marked SYS_FIELDS row");
				return Err(CatalogError::DeleteMarkedField {
					table: table_name.to_string(),
					index: index.name.clone(),
					pos: i,
				}
				.into());
			}

			let word = record.read_u32(fields::POS)?;
			let Some(prefix_len) = u16::try_from(i).ok().and_then(|i| unpack_field_pos(word, i)) else {
				error!(table = table_name, index = %index.name, field = i, word, "SYS_FIELDS row out of sequence");
				return Err(CatalogError::FieldRowMismatch {
					table: table_name.to_string(),
					index: index.name.clone(),
					pos: i,
				}
				.into());
			};

			index.add_field(record.read_str(fields::COL_NAME)?, prefix_len);
		}

		scan.close();
		Ok(())
	}
}
