// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	ops::Deref,
};

/// Order-preserving encoding of the leading fields of a record or search
/// tuple. Index trees are ordered by this key.
#[derive(Clone, PartialOrd, Ord, Hash, PartialEq, Eq)]
pub struct EncodedKey(pub Vec<u8>);

impl Deref for EncodedKey {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl EncodedKey {
	pub fn new(key: impl Into<Vec<u8>>) -> Self {
		Self(key.into())
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for EncodedKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "EncodedKey(")?;
		for byte in &self.0 {
			write!(f, "{:02x}", byte)?;
		}
		write!(f, ")")
	}
}
