// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{EncodedKey, Tuple};
use sysdict_type::PageId;

use crate::{BufferPool, Mtr, StoreError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchMode {
	/// First record whose key is `>=` the search key.
	GreaterOrEqual,
	/// First record whose key is `>` the search key.
	Greater,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
	On(EncodedKey),
	AfterLast,
}

/// A position in one index tree that survives committing its
/// mini-transaction.
///
/// Records returned by [`get_rec`](Self::get_rec) borrow the cursor, so none
/// can be held across [`commit`](Self::commit).
#[derive(Debug)]
pub struct PersistentCursor {
	pool: BufferPool,
	page: PageId,
	mtr: Option<Mtr>,
	position: Position,
	stored: Option<Position>,
}

impl PersistentCursor {
	/// Opens a cursor on the first user record at or after `tuple`.
	pub fn open_on_user_rec(
		pool: &BufferPool,
		page: PageId,
		tuple: &Tuple,
		mode: SearchMode,
	) -> Result<Self, StoreError> {
		let mtr = Mtr::start(pool, page)?;
		let position = Self::seek(&mtr, &tuple.encode(), mode);
		Ok(Self {
			pool: pool.clone(),
			page,
			mtr: Some(mtr),
			position,
			stored: None,
		})
	}

	/// Opens a cursor on the first user record of the index.
	pub fn open_at_index_side(pool: &BufferPool, page: PageId) -> Result<Self, StoreError> {
		Self::open_on_user_rec(pool, page, &Tuple::new(), SearchMode::GreaterOrEqual)
	}

	fn seek(mtr: &Mtr, key: &EncodedKey, mode: SearchMode) -> Position {
		match mtr.tree().seek(key, mode) {
			Some(key) => Position::On(key.clone()),
			None => Position::AfterLast,
		}
	}

	pub fn page(&self) -> PageId {
		self.page
	}

	/// False once the cursor has moved past the last user record, or while
	/// its mini-transaction is committed.
	pub fn is_on_user_rec(&self) -> bool {
		self.mtr.is_some() && matches!(self.position, Position::On(_))
	}

	pub fn get_rec(&self) -> Option<&[u8]> {
		match (&self.mtr, &self.position) {
			(Some(mtr), Position::On(key)) => mtr.tree().get(key),
			_ => None,
		}
	}

	/// Advances to the next user record; returns false when there is none.
	pub fn move_to_next_user_rec(&mut self) -> bool {
		let Some(mtr) = &self.mtr else {
			return false;
		};
		self.position = match &self.position {
			Position::On(key) => Self::seek(mtr, key, SearchMode::Greater),
			Position::AfterLast => Position::AfterLast,
		};
		matches!(self.position, Position::On(_))
	}

	pub fn store_position(&mut self) {
		self.stored = Some(self.position.clone());
	}

	pub fn commit(&mut self) {
		if let Some(mtr) = self.mtr.take() {
			mtr.commit();
		}
	}

	/// Starts a new mini-transaction and repositions the cursor at the
	/// stored record. Returns true when that record still exists; otherwise
	/// the cursor lands on its nearest successor.
	pub fn restore_position(&mut self) -> Result<bool, StoreError> {
		let stored = self.stored.clone().ok_or(StoreError::NoStoredPosition)?;
		self.commit();
		let mtr = Mtr::start(&self.pool, self.page)?;

		let (position, exact) = match stored {
			Position::On(key) if mtr.tree().contains(&key) => (Position::On(key), true),
			Position::On(key) => (Self::seek(&mtr, &key, SearchMode::Greater), false),
			Position::AfterLast => (Position::AfterLast, false),
		};

		self.position = position;
		self.mtr = Some(mtr);
		Ok(exact)
	}

	pub fn close(mut self) {
		self.commit();
	}
}

#[cfg(test)]
mod tests {
	use sysdict_core::record::{FieldTemplate, RecordBuilder, RecordLayout};
	use sysdict_type::SpaceId;

	use super::*;

	fn setup(names: &[&str]) -> (BufferPool, PageId, RecordLayout) {
		let pool = BufferPool::new();
		let layout = RecordLayout::new([FieldTemplate::variable("NAME")]);
		let page = pool.allocate_page(SpaceId::SYSTEM);
		pool.create_tree(page, layout.clone(), 1).unwrap();
		for name in names {
			pool.insert(page, RecordBuilder::new(&layout).set(0, name).build().unwrap()).unwrap();
		}
		(pool, page, layout)
	}

	fn name(cursor: &PersistentCursor, layout: &RecordLayout) -> String {
		layout.decode(cursor.get_rec().unwrap()).unwrap().read_str(0).unwrap().to_string()
	}

	#[test]
	fn test_open_and_iterate() {
		let (pool, page, layout) = setup(&["db/a", "db/b", "other/x"]);
		let mut cursor =
			PersistentCursor::open_on_user_rec(&pool, page, &Tuple::single("db/"), SearchMode::GreaterOrEqual)
				.unwrap();
		assert!(cursor.is_on_user_rec());
		assert_eq!(name(&cursor, &layout), "db/a");
		assert!(cursor.move_to_next_user_rec());
		assert_eq!(name(&cursor, &layout), "db/b");
		assert!(cursor.move_to_next_user_rec());
		assert!(!cursor.move_to_next_user_rec());
		assert!(!cursor.is_on_user_rec());
		assert_eq!(cursor.get_rec(), None);
		cursor.close();
	}

	#[test]
	fn test_empty_index() {
		let (pool, page, _) = setup(&[]);
		let cursor = PersistentCursor::open_at_index_side(&pool, page).unwrap();
		assert!(!cursor.is_on_user_rec());
	}

	#[test]
	fn test_restore_exact() {
		let (pool, page, layout) = setup(&["a", "b", "c"]);
		let mut cursor = PersistentCursor::open_at_index_side(&pool, page).unwrap();
		cursor.move_to_next_user_rec();
		cursor.store_position();
		cursor.commit();
		assert!(!cursor.is_on_user_rec());

		pool.insert(page, RecordBuilder::new(&layout).set(0, "bb").build().unwrap()).unwrap();
		assert!(cursor.restore_position().unwrap());
		assert_eq!(name(&cursor, &layout), "b");
		cursor.move_to_next_user_rec();
		assert_eq!(name(&cursor, &layout), "bb");
	}

	#[test]
	fn test_restore_lands_on_successor() {
		let (pool, page, layout) = setup(&["a", "b", "c"]);
		let mut cursor = PersistentCursor::open_at_index_side(&pool, page).unwrap();
		cursor.move_to_next_user_rec();
		cursor.store_position();
		cursor.commit();

		pool.remove(page, &Tuple::single("b")).unwrap();
		assert!(!cursor.restore_position().unwrap());
		assert_eq!(name(&cursor, &layout), "c");
	}

	#[test]
	fn test_restore_past_end() {
		let (pool, page, _) = setup(&["a"]);
		let mut cursor = PersistentCursor::open_at_index_side(&pool, page).unwrap();
		cursor.store_position();
		cursor.commit();

		pool.remove(page, &Tuple::single("a")).unwrap();
		assert!(!cursor.restore_position().unwrap());
		assert!(!cursor.is_on_user_rec());
	}

	#[test]
	fn test_restore_without_store() {
		let (pool, page, _) = setup(&["a"]);
		let mut cursor = PersistentCursor::open_at_index_side(&pool, page).unwrap();
		assert!(matches!(cursor.restore_position(), Err(StoreError::NoStoredPosition)));
	}
}
