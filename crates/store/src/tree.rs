// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	ops::Bound::{Excluded, Included, Unbounded},
};

use sysdict_core::{EncodedKey, record::RecordLayout};

use crate::{SearchMode, StoreError};

/// The user records of one index, ordered by the key over their first
/// `n_uniq` fields.
#[derive(Debug, Clone)]
pub struct Tree {
	layout: RecordLayout,
	n_uniq: usize,
	records: BTreeMap<EncodedKey, Vec<u8>>,
}

impl Tree {
	pub fn new(layout: RecordLayout, n_uniq: usize) -> Self {
		Self {
			layout,
			n_uniq,
			records: BTreeMap::new(),
		}
	}

	pub fn layout(&self) -> &RecordLayout {
		&self.layout
	}

	pub fn n_uniq(&self) -> usize {
		self.n_uniq
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Validates `bytes` against the tree's template and inserts it.
	pub fn insert(&mut self, bytes: Vec<u8>) -> Result<EncodedKey, StoreError> {
		let key = self.layout.decode(&bytes)?.key(self.n_uniq);
		self.insert_raw(key.clone(), bytes)?;
		Ok(key)
	}

	/// Inserts a record under `key` without looking at its bytes.
	pub fn insert_raw(&mut self, key: EncodedKey, bytes: Vec<u8>) -> Result<(), StoreError> {
		if self.records.contains_key(&key) {
			return Err(StoreError::DuplicateKey {
				key,
			});
		}
		self.records.insert(key, bytes);
		Ok(())
	}

	pub fn remove(&mut self, key: &EncodedKey) -> Option<Vec<u8>> {
		self.records.remove(key)
	}

	pub fn get(&self, key: &EncodedKey) -> Option<&[u8]> {
		self.records.get(key).map(Vec::as_slice)
	}

	pub fn get_mut(&mut self, key: &EncodedKey) -> Option<&mut Vec<u8>> {
		self.records.get_mut(key)
	}

	pub fn contains(&self, key: &EncodedKey) -> bool {
		self.records.contains_key(key)
	}

	pub fn first(&self) -> Option<&EncodedKey> {
		self.records.keys().next()
	}

	/// First key at or after `key` according to `mode`.
	pub fn seek(&self, key: &EncodedKey, mode: SearchMode) -> Option<&EncodedKey> {
		let lower = match mode {
			SearchMode::GreaterOrEqual => Included(key),
			SearchMode::Greater => Excluded(key),
		};
		self.records.range::<EncodedKey, _>((lower, Unbounded)).next().map(|(k, _)| k)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&EncodedKey, &[u8])> {
		self.records.iter().map(|(k, v)| (k, v.as_slice()))
	}
}

#[cfg(test)]
mod tests {
	use sysdict_core::{
		Tuple,
		record::{FieldTemplate, RecordBuilder},
	};

	use super::*;

	fn tree() -> Tree {
		let layout = RecordLayout::new([FieldTemplate::variable("NAME"), FieldTemplate::fixed("N", 4)]);
		let mut tree = Tree::new(layout.clone(), 1);
		for (name, n) in [("b", 2u32), ("a", 1), ("c", 3)] {
			tree.insert(RecordBuilder::new(&layout).set(0, name).set_u32(1, n).build().unwrap()).unwrap();
		}
		tree
	}

	#[test]
	fn test_records_ordered_by_key() {
		let tree = tree();
		let names: Vec<String> = tree
			.iter()
			.map(|(_, bytes)| tree.layout().decode(bytes).unwrap().read_str(0).unwrap().to_string())
			.collect();
		assert_eq!(names, vec!["a", "b", "c"]);
	}

	#[test]
	fn test_duplicate_key() {
		let mut tree = tree();
		let layout = tree.layout().clone();
		let bytes = RecordBuilder::new(&layout).set(0, "a").set_u32(1, 9).build().unwrap();
		assert!(matches!(tree.insert(bytes), Err(StoreError::DuplicateKey { .. })));
	}

	#[test]
	fn test_insert_validates_record() {
		let mut tree = tree();
		assert!(matches!(tree.insert(vec![0x00]), Err(StoreError::Record(_))));
	}

	#[test]
	fn test_seek() {
		let tree = tree();
		let b = Tuple::single("b").encode();
		assert_eq!(tree.seek(&b, SearchMode::GreaterOrEqual), Some(&b));
		assert_eq!(tree.seek(&b, SearchMode::Greater), Some(&Tuple::single("c").encode()));
		assert_eq!(tree.seek(&Tuple::single("bb").encode(), SearchMode::GreaterOrEqual), Some(&Tuple::single("c").encode()));
		assert_eq!(tree.seek(&Tuple::single("d").encode(), SearchMode::GreaterOrEqual), None);
		assert_eq!(tree.seek(&Tuple::new().encode(), SearchMode::GreaterOrEqual), tree.first());
	}
}
