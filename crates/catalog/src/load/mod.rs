// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Loading of table descriptors from the system tables.
//!
//! Each loader is a method of [`DictGuard`](crate::DictGuard) and reads one
//! system table through a [`PrefixScan`].

use sysdict_core::Tuple;
use sysdict_type::{Result, TableId};

use crate::{
	CatalogError, DictGuard,
	scan::{DeleteMarked, PrefixScan},
};

mod bootstrap;
mod column;
mod field;
mod foreign;
mod index;
mod table;

impl DictGuard<'_> {
	/// Scans the clustered index of a cached system table.
	pub(crate) fn scan_clustered(&self, table_id: TableId, prefix: Tuple, policy: DeleteMarked) -> Result<PrefixScan> {
		let table = self.cache.table(table_id).ok_or(CatalogError::SystemTableMissing {
			table_id,
		})?;
		let index = table.clustered_index().ok_or_else(|| CatalogError::SystemIndexMissing {
			table: table.name.clone(),
			index: "CLUST_IND".to_string(),
		})?;
		PrefixScan::open(&self.system.pool, table, index, prefix, policy)
	}

	/// Scans the index `name` of a cached system table.
	pub(crate) fn scan_index(
		&self,
		table_id: TableId,
		name: &str,
		prefix: Tuple,
		policy: DeleteMarked,
	) -> Result<PrefixScan> {
		let table = self.cache.table(table_id).ok_or(CatalogError::SystemTableMissing {
			table_id,
		})?;
		let index = table.index(name).ok_or_else(|| CatalogError::SystemIndexMissing {
			table: table.name.clone(),
			index: name.to_string(),
		})?;
		PrefixScan::open(&self.system.pool, table, index, prefix, policy)
	}
}
