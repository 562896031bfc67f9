// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Packed 32-bit words stored in SYS_FIELDS.POS and SYS_FOREIGN.N_COLS.

/// Largest field count a SYS_FOREIGN.N_COLS word can carry.
pub const MAX_FOREIGN_FIELDS: u32 = (1 << 24) - 1;

/// Encodes SYS_FIELDS.POS. When any field of the index has a column prefix,
/// the position goes in the high half and the prefix length in the low half;
/// otherwise the word is just the position.
pub fn pack_field_pos(pos: u16, prefix_len: u16, index_has_prefix: bool) -> u32 {
	if index_has_prefix {
		((pos as u32) << 16) | prefix_len as u32
	} else {
		pos as u32
	}
}

/// Decodes SYS_FIELDS.POS for the field expected at position `i`, returning
/// its prefix length, or `None` when the word does not describe field `i`.
///
/// Field 0 of an index without prefixes is stored as `0`, and as `prefix_len`
/// when the index has prefixes, which is why a non-zero word at position 0 is
/// read as a prefix length.
pub fn unpack_field_pos(word: u32, i: u16) -> Option<u16> {
	let i = i as u32;
	if word & 0xFFFF != i && word & 0xFFFF_0000 != i << 16 {
		return None;
	}

	if (i == 0 && word > 0) || word & 0xFFFF_0000 != 0 {
		Some((word & 0xFFFF) as u16)
	} else {
		Some(0)
	}
}

/// Encodes SYS_FOREIGN.N_COLS: the ON DELETE/ON UPDATE action bits in the top
/// byte, the field count below.
pub fn pack_foreign_cols(n_fields: u32, actions: u8) -> u32 {
	((actions as u32) << 24) | (n_fields & MAX_FOREIGN_FIELDS)
}

/// Decodes SYS_FOREIGN.N_COLS into `(n_fields, actions)`.
pub fn unpack_foreign_cols(word: u32) -> (u32, u8) {
	(word & MAX_FOREIGN_FIELDS, (word >> 24) as u8)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_field_pos_without_prefix() {
		for i in [0u16, 1, 7, 300, u16::MAX] {
			let word = pack_field_pos(i, 0, false);
			assert_eq!(word, i as u32);
			assert_eq!(unpack_field_pos(word, i), Some(0));
		}
	}

	#[test]
	fn test_field_pos_with_prefix() {
		for (i, prefix) in [(0u16, 10u16), (1, 0), (1, 255), (5, 767), (300, u16::MAX)] {
			let word = pack_field_pos(i, prefix, true);
			assert_eq!(unpack_field_pos(word, i), Some(prefix));
		}
	}

	#[test]
	fn test_field_pos_mismatch() {
		assert_eq!(unpack_field_pos(2, 1), None);
		assert_eq!(unpack_field_pos(pack_field_pos(3, 10, true), 2), None);
	}

	#[test]
	fn test_foreign_cols() {
		for (n, actions) in [(0u32, 0u8), (1, 1), (3, 0x1F), (MAX_FOREIGN_FIELDS, 0xFF)] {
			assert_eq!(unpack_foreign_cols(pack_foreign_cols(n, actions)), (n, actions));
		}
		assert_eq!(pack_foreign_cols(2, 1), 0x0100_0002);
	}
}
