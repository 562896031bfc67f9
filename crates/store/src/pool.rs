// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{Debug, Formatter},
	ops::Deref,
	sync::Arc,
};

use crossbeam_skiplist::SkipMap;
use parking_lot::{Mutex, RwLock};
use sysdict_core::{EncodedKey, Tuple, record, record::RecordLayout};
use sysdict_type::{PageId, PageNo, SpaceId};
use tracing::debug;

use crate::{DictHeader, StoreError, Tree};

/// First page number handed out by [`BufferPool::allocate_page`]; the pages
/// below it hold the file space headers and the dictionary header.
pub const FIRST_ALLOCATED_PAGE: u32 = 8;

/// Index trees addressed by their root page.
///
/// Each tree sits behind its own latch. Readers pin an immutable snapshot;
/// writers copy the tree when a snapshot is still pinned.
#[derive(Clone, Default)]
pub struct BufferPool(Arc<BufferPoolInner>);

impl Deref for BufferPool {
	type Target = BufferPoolInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Debug for BufferPool {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BufferPool").field("trees", &self.trees.len()).finish()
	}
}

#[derive(Default)]
pub struct BufferPoolInner {
	trees: SkipMap<PageId, Arc<RwLock<Arc<Tree>>>>,
	next_page: Mutex<HashMap<SpaceId, u32>>,
	header: RwLock<Option<DictHeader>>,
}

impl BufferPool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn allocate_page(&self, space: SpaceId) -> PageId {
		let mut next_page = self.next_page.lock();
		let page_no = next_page.entry(space).or_insert(FIRST_ALLOCATED_PAGE);
		let page = PageId::new(space, PageNo(*page_no));
		*page_no += 1;
		page
	}

	pub fn create_tree(&self, page: PageId, layout: RecordLayout, n_uniq: usize) -> Result<(), StoreError> {
		if self.trees.contains_key(&page) {
			return Err(StoreError::PageInUse {
				page,
			});
		}
		debug!(%page, n_fields = layout.n_fields(), n_uniq, "creating index tree");
		self.trees.insert(page, Arc::new(RwLock::new(Arc::new(Tree::new(layout, n_uniq)))));
		Ok(())
	}

	pub fn contains(&self, page: PageId) -> bool {
		self.trees.contains_key(&page)
	}

	/// Current snapshot of the tree at `page`. It stays valid, unchanged,
	/// for as long as it is held.
	pub fn pin(&self, page: PageId) -> Result<Arc<Tree>, StoreError> {
		Ok(self.slot(page)?.read().clone())
	}

	pub fn insert(&self, page: PageId, bytes: Vec<u8>) -> Result<EncodedKey, StoreError> {
		let slot = self.slot(page)?;
		let mut tree = slot.write();
		Arc::make_mut(&mut *tree).insert(bytes)
	}

	/// Stores a record under an explicit key, bypassing template checks.
	pub fn insert_raw(&self, page: PageId, key: EncodedKey, bytes: Vec<u8>) -> Result<(), StoreError> {
		let slot = self.slot(page)?;
		let mut tree = slot.write();
		Arc::make_mut(&mut *tree).insert_raw(key, bytes)
	}

	/// Sets or clears the delete mark of the record whose key fields equal
	/// `key`.
	pub fn set_delete_mark(&self, page: PageId, key: &Tuple, deleted: bool) -> Result<(), StoreError> {
		let slot = self.slot(page)?;
		let mut tree = slot.write();
		let key = key.encode();
		let bytes = Arc::make_mut(&mut *tree).get_mut(&key).ok_or_else(|| StoreError::RecordNotFound {
			page,
			key: key.clone(),
		})?;
		record::set_delete_mark(bytes, deleted);
		Ok(())
	}

	pub fn remove(&self, page: PageId, key: &Tuple) -> Result<Vec<u8>, StoreError> {
		let slot = self.slot(page)?;
		let mut tree = slot.write();
		let key = key.encode();
		Arc::make_mut(&mut *tree).remove(&key).ok_or(StoreError::RecordNotFound {
			page,
			key,
		})
	}

	pub fn dict_header(&self) -> Result<DictHeader, StoreError> {
		let header = *self.header.read();
		header.ok_or(StoreError::NoDictHeader)
	}

	pub fn set_dict_header(&self, header: DictHeader) {
		*self.header.write() = Some(header);
	}

	fn slot(&self, page: PageId) -> Result<Arc<RwLock<Arc<Tree>>>, StoreError> {
		self.trees.get(&page).map(|entry| entry.value().clone()).ok_or(StoreError::PageNotFound {
			page,
		})
	}
}
