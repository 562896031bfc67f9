// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Keycode is a lexicographical order-preserving binary encoding for the
//! fields of an index key.
//!
//! Each field is encoded as a marker byte followed by its body:
//!
//! * SQL NULL: `0x00`, no body. NULL sorts before every value.
//! * value: `0x01`, then the bytes with `0x00` escaped as `0x00ff`,
//!   terminated with `0x0000`.
//!
//! The terminator sorts below every escaped byte, so a shorter value sorts
//! before any longer value it is a prefix of, and the encoding of a tuple of
//! `k` fields is a byte prefix of the encoding of any key whose first `k`
//! fields are equal to it. Positioning a cursor at the first key `>=` an
//! encoded prefix tuple therefore lands on the first key that matches it.

const NULL_MARKER: u8 = 0x00;
const VALUE_MARKER: u8 = 0x01;

/// Appends one field to an encoded key.
pub fn encode_field(output: &mut Vec<u8>, value: Option<&[u8]>) {
	match value {
		None => output.push(NULL_MARKER),
		Some(bytes) => {
			output.push(VALUE_MARKER);
			encode_bytes(output, bytes);
		}
	}
}

/// Appends an escaped, terminated byte string.
pub fn encode_bytes(output: &mut Vec<u8>, bytes: &[u8]) {
	output.reserve(bytes.len() + 2);
	for &byte in bytes {
		match byte {
			0x00 => output.extend_from_slice(&[0x00, 0xff]),
			b => output.push(b),
		}
	}
	output.extend_from_slice(&[0x00, 0x00]);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode(fields: &[Option<&[u8]>]) -> Vec<u8> {
		let mut output = Vec::new();
		for field in fields {
			encode_field(&mut output, *field);
		}
		output
	}

	#[test]
	fn test_escapes_zero_bytes() {
		assert_eq!(encode(&[Some(&[0x00, 0x01])]), vec![0x01, 0x00, 0xff, 0x01, 0x00, 0x00]);
	}

	#[test]
	fn test_null_sorts_first() {
		assert!(encode(&[None]) < encode(&[Some(b"")]));
		assert!(encode(&[Some(b"")]) < encode(&[Some(b"\x00")]));
	}

	#[test]
	fn test_prefix_sorts_before_extension() {
		let db = encode(&[Some(b"db/")]);
		assert!(encode(&[Some(b"db")]) < db);
		assert!(db < encode(&[Some(b"db/a")]));
		assert!(encode(&[Some(b"db/a")]) < encode(&[Some(b"db0")]));
	}

	#[test]
	fn test_tuple_is_prefix_of_longer_key() {
		let id = 42u64.to_be_bytes();
		let prefix = encode(&[Some(&id)]);
		let key = encode(&[Some(&id), Some(&7u32.to_be_bytes())]);
		assert!(key.starts_with(&prefix));
		assert!(prefix < key);

		let smaller = encode(&[Some(&41u64.to_be_bytes()), Some(&u32::MAX.to_be_bytes())]);
		assert!(smaller < prefix);
	}

	#[test]
	fn test_big_endian_integers_keep_order() {
		let mut keys: Vec<Vec<u8>> =
			[256u32, 0, 1, 255, 65536].iter().map(|v| encode(&[Some(&v.to_be_bytes())])).collect();
		keys.sort();
		let expected: Vec<Vec<u8>> =
			[0u32, 1, 255, 256, 65536].iter().map(|v| encode(&[Some(&v.to_be_bytes())])).collect();
		assert_eq!(keys, expected);
	}
}
