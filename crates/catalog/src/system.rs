// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use parking_lot::{Mutex, MutexGuard};
use sysdict_store::{BufferPool, Tablespaces};

use crate::{DictCache, DictConfig, SemaphoreWatchdog};

/// The data dictionary of one server: its cache of table descriptors and
/// everything the loaders read from.
///
/// All loading goes through a [`DictGuard`], which holds the dictionary
/// mutex for as long as it lives.
pub struct DictSystem {
	pub(crate) pool: BufferPool,
	pub(crate) tablespaces: Arc<dyn Tablespaces>,
	pub(crate) config: DictConfig,
	pub(crate) watchdog: SemaphoreWatchdog,
	pub(crate) cache: Mutex<DictCache>,
}

impl Debug for DictSystem {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DictSystem")
			.field("pool", &self.pool)
			.field("config", &self.config)
			.field("watchdog", &self.watchdog)
			.finish_non_exhaustive()
	}
}

impl DictSystem {
	pub fn pool(&self) -> &BufferPool {
		&self.pool
	}

	pub fn tablespaces(&self) -> &dyn Tablespaces {
		self.tablespaces.as_ref()
	}

	pub fn config(&self) -> &DictConfig {
		&self.config
	}

	pub fn watchdog(&self) -> &SemaphoreWatchdog {
		&self.watchdog
	}

	/// Takes the dictionary mutex.
	pub fn lock(&self) -> DictGuard<'_> {
		DictGuard {
			system: self,
			cache: self.cache.lock(),
		}
	}
}

/// Proof that the dictionary mutex is held. Every loader is a method of
/// this guard; dropping it releases the mutex.
pub struct DictGuard<'a> {
	pub(crate) system: &'a DictSystem,
	pub(crate) cache: MutexGuard<'a, DictCache>,
}

impl Debug for DictGuard<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DictGuard").field("tables", &self.cache.len()).finish()
	}
}

impl<'a> DictGuard<'a> {
	pub fn system(&self) -> &'a DictSystem {
		self.system
	}

	pub fn cache(&self) -> &DictCache {
		&self.cache
	}
}
