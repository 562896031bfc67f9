// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

macro_rules! define_id {
	($(#[$meta:meta])* $name:ident($inner:ty)) => {
		$(#[$meta])*
		#[repr(transparent)]
		#[derive(Debug, Copy, Clone, Default, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub $inner);

		impl Deref for $name {
			type Target = $inner;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}

		impl PartialEq<$inner> for $name {
			fn eq(&self, other: &$inner) -> bool {
				self.0.eq(other)
			}
		}

		impl From<$name> for $inner {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl From<$inner> for $name {
			fn from(value: $inner) -> Self {
				Self(value)
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				Display::fmt(&self.0, f)
			}
		}
	};
}

define_id!(
	/// Identity of a table, stored as 8 big-endian bytes in SYS_TABLES.ID.
	TableId(u64)
);

define_id!(
	/// Identity of an index, unique across the whole system.
	IndexId(u64)
);

define_id!(
	/// Tablespace id; 0 is the shared system tablespace.
	SpaceId(u32)
);

define_id!(PageNo(u32));

impl TableId {
	pub fn to_be_bytes(self) -> [u8; 8] {
		self.0.to_be_bytes()
	}
}

impl IndexId {
	pub fn to_be_bytes(self) -> [u8; 8] {
		self.0.to_be_bytes()
	}
}

impl SpaceId {
	/// The shared system tablespace.
	pub const SYSTEM: SpaceId = SpaceId(0);

	pub fn is_system(self) -> bool {
		self.0 == 0
	}
}

impl PageNo {
	/// "No page": an index whose root carries this number has been freed.
	pub const NIL: PageNo = PageNo(0xFFFF_FFFF);

	pub fn is_nil(self) -> bool {
		self == Self::NIL
	}
}

/// A page address: tablespace and page number within it.
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct PageId {
	pub space: SpaceId,
	pub page_no: PageNo,
}

impl PageId {
	pub fn new(space: impl Into<SpaceId>, page_no: impl Into<PageNo>) -> Self {
		Self {
			space: space.into(),
			page_no: page_no.into(),
		}
	}
}

impl Display for PageId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.space, self.page_no)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_serde_is_transparent() {
		let json = serde_json::to_string(&TableId(42)).unwrap();
		assert_eq!(json, "42");
		let back: TableId = serde_json::from_str(&json).unwrap();
		assert_eq!(back, 42);
	}

	#[test]
	fn test_nil_page() {
		assert!(PageNo(0xFFFF_FFFF).is_nil());
		assert!(!PageNo(3).is_nil());
		assert!(SpaceId::SYSTEM.is_system());
	}
}
