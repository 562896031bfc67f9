// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use smallvec::SmallVec;

use crate::{EncodedKey, encoding::keycode};

/// A search tuple: the leading fields of an index key, used to position a
/// cursor and to bound a prefix scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tuple {
	fields: SmallVec<[Option<Vec<u8>>; 2]>,
}

impl Tuple {
	/// The empty tuple matches every record.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn single(value: impl Into<Vec<u8>>) -> Self {
		let mut tuple = Self::new();
		tuple.push(value);
		tuple
	}

	pub fn push(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
		self.fields.push(Some(value.into()));
		self
	}

	pub fn push_null(&mut self) -> &mut Self {
		self.fields.push(None);
		self
	}

	pub fn with(mut self, value: impl Into<Vec<u8>>) -> Self {
		self.push(value);
		self
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn field(&self, i: usize) -> Option<&[u8]> {
		self.fields.get(i).and_then(|f| f.as_deref())
	}

	pub fn iter(&self) -> impl Iterator<Item = Option<&[u8]>> {
		self.fields.iter().map(|f| f.as_deref())
	}

	pub fn encode(&self) -> EncodedKey {
		let mut output = Vec::new();
		for field in self.iter() {
			keycode::encode_field(&mut output, field);
		}
		EncodedKey::new(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_tuple_sorts_first() {
		assert!(Tuple::new().encode() < Tuple::single(Vec::new()).encode());
	}

	#[test]
	fn test_encode_is_prefix() {
		let prefix = Tuple::single(42u64.to_be_bytes());
		let full = Tuple::single(42u64.to_be_bytes()).with(3u32.to_be_bytes());
		assert!(full.encode().starts_with(&prefix.encode()));
		assert_eq!(full.len(), 2);
		assert_eq!(full.field(1), Some(&3u32.to_be_bytes()[..]));
		assert_eq!(full.field(2), None);
	}
}
