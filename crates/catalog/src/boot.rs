// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use sysdict_core::system::{columns, fields, indexes, tables};
use sysdict_store::{BufferPool, Tablespaces};
use sysdict_type::Result;
use tracing::{info, instrument};

use crate::{DictCache, DictConfig, DictSystem, SemaphoreWatchdog};

impl DictSystem {
	/// Builds the four boot tables from the dictionary header of `pool` and
	/// checks their index rows in SYS_INDEXES.
	#[instrument(name = "dict::boot", level = "debug", skip_all)]
	pub fn boot(pool: BufferPool, tablespaces: Arc<dyn Tablespaces>, config: DictConfig) -> Result<Self> {
		let header = pool.dict_header()?;
		let system = Self {
			pool,
			tablespaces,
			watchdog: SemaphoreWatchdog::new(config.fatal_semaphore_wait_threshold),
			config,
			cache: Mutex::new(DictCache::new()),
		};

		{
			let mut guard = system.lock();
			guard.cache.add_table(tables::definition(header.tables, header.table_ids))?;
			guard.cache.add_table(columns::definition(header.columns))?;
			guard.cache.add_table(indexes::definition(header.indexes))?;
			guard.cache.add_table(fields::definition(header.fields))?;

			for table_id in [tables::TABLE_ID, columns::TABLE_ID, indexes::TABLE_ID, fields::TABLE_ID] {
				guard.load_sys_table(table_id)?;
			}
		}

		info!(max_table_id = header.table_id, max_index_id = header.index_id, "data dictionary booted");
		Ok(system)
	}
}
