// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use sysdict_type::PageId;
use tracing::trace;

use crate::{BufferPool, StoreError, Tree};

/// A mini-transaction over one index tree. Records read through it stay
/// valid until it is committed.
#[derive(Debug)]
pub struct Mtr {
	page: PageId,
	tree: Arc<Tree>,
}

impl Mtr {
	pub fn start(pool: &BufferPool, page: PageId) -> Result<Self, StoreError> {
		let tree = pool.pin(page)?;
		trace!(%page, "mtr start");
		Ok(Self {
			page,
			tree,
		})
	}

	pub fn page(&self) -> PageId {
		self.page
	}

	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	pub fn commit(self) {
		trace!(page = %self.page, "mtr commit");
	}
}
