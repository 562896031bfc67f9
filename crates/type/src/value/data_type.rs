// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Main type code of a column, as stored in SYS_COLUMNS.MTYPE.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MainType(pub u32);

impl MainType {
	pub const VARCHAR: MainType = MainType(1);
	pub const CHAR: MainType = MainType(2);
	pub const FIXBINARY: MainType = MainType(3);
	pub const BINARY: MainType = MainType(4);
	pub const BLOB: MainType = MainType(5);
	pub const INT: MainType = MainType(6);
	pub const SYS_CHILD: MainType = MainType(7);
	pub const SYS: MainType = MainType(8);
	pub const FLOAT: MainType = MainType(9);
	pub const DOUBLE: MainType = MainType(10);
	pub const DECIMAL: MainType = MainType(11);
	pub const VARMYSQL: MainType = MainType(12);
	pub const MYSQL: MainType = MainType(13);

	/// Stored size of a value of this type, or `None` for variable-length types.
	pub fn fixed_size(self, len: u32) -> Option<usize> {
		match self {
			Self::SYS | Self::CHAR | Self::FIXBINARY | Self::INT | Self::FLOAT | Self::DOUBLE | Self::MYSQL => {
				Some(len as usize)
			}
			_ => None,
		}
	}

	pub fn is_string(self) -> bool {
		self.0 <= Self::BLOB.0 || self == Self::MYSQL || self == Self::VARMYSQL
	}

	pub fn is_binary_string(self, prtype: PreciseType) -> bool {
		self == Self::FIXBINARY || self == Self::BINARY || (self == Self::BLOB && prtype.is_binary())
	}

	/// String types that carry a character set and need a collation.
	pub fn is_non_binary_string(self, prtype: PreciseType) -> bool {
		self.is_string() && !self.is_binary_string(prtype)
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::VARCHAR => "DATA_VARCHAR",
			Self::CHAR => "DATA_CHAR",
			Self::FIXBINARY => "DATA_FIXBINARY",
			Self::BINARY => "DATA_BINARY",
			Self::BLOB => "DATA_BLOB",
			Self::INT => "DATA_INT",
			Self::SYS_CHILD => "DATA_SYS_CHILD",
			Self::SYS => "DATA_SYS",
			Self::FLOAT => "DATA_FLOAT",
			Self::DOUBLE => "DATA_DOUBLE",
			Self::DECIMAL => "DATA_DECIMAL",
			Self::VARMYSQL => "DATA_VARMYSQL",
			Self::MYSQL => "DATA_MYSQL",
			_ => "DATA_UNKNOWN",
		}
	}
}

impl Display for MainType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Precise type of a column: MySQL type code in the low byte, flag bits above
/// it and the charset-collation id in bits 16..24.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreciseType(pub u32);

impl PreciseType {
	pub const ROW_ID: u32 = 0;
	pub const TRX_ID: u32 = 1;
	pub const ROLL_PTR: u32 = 2;
	pub const MIX_ID: u32 = 3;

	pub const NOT_NULL: u32 = 256;
	pub const UNSIGNED: u32 = 512;
	pub const BINARY_TYPE: u32 = 1024;

	pub const MYSQL_TYPE_MASK: u32 = 255;

	pub fn is_not_null(self) -> bool {
		self.0 & Self::NOT_NULL != 0
	}

	pub fn is_unsigned(self) -> bool {
		self.0 & Self::UNSIGNED != 0
	}

	pub fn is_binary(self) -> bool {
		self.0 & Self::BINARY_TYPE != 0
	}

	pub fn mysql_type(self) -> u32 {
		self.0 & Self::MYSQL_TYPE_MASK
	}

	pub fn charset_coll(self) -> u32 {
		(self.0 >> 16) & 0xFF
	}

	pub fn with_charset_coll(self, charset_coll: u32) -> PreciseType {
		PreciseType((self.0 & 0xFFFF) | ((charset_coll & 0xFF) << 16))
	}

	/// Rows written before collations were recorded leave the charset of
	/// non-binary strings at 0; such columns take the server default.
	pub fn with_legacy_collation(self, mtype: MainType, default_charset_coll: u32) -> PreciseType {
		if mtype.is_non_binary_string(self) && self.charset_coll() == 0 {
			self.with_charset_coll(default_charset_coll)
		} else {
			self
		}
	}
}

/// Whether values of the two column types can be compared with each other,
/// which is what a foreign key needs between its child and parent columns.
pub fn types_are_equal(
	a: (MainType, PreciseType, u32),
	b: (MainType, PreciseType, u32),
	check_charsets: bool,
) -> bool {
	let (mtype_a, prtype_a, len_a) = a;
	let (mtype_b, prtype_b, len_b) = b;

	if mtype_a.is_non_binary_string(prtype_a) && mtype_b.is_non_binary_string(prtype_b) {
		return !check_charsets || prtype_a.charset_coll() == prtype_b.charset_coll();
	}

	if mtype_a.is_binary_string(prtype_a) && mtype_b.is_binary_string(prtype_b) {
		return true;
	}

	if mtype_a != mtype_b {
		return false;
	}

	if mtype_a == MainType::INT && (prtype_a.is_unsigned() != prtype_b.is_unsigned() || len_a != len_b) {
		return false;
	}

	true
}
