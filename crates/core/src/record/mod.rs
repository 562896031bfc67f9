// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Stored record format. All integers are big-endian.
//!
//! ```text
//! [info bits: u8][n_fields: u16][null bitmap: ceil(n_fields / 8) bytes]
//! [end offset: u16 per variable-length field of the template]
//! [field bodies in index order]
//! ```
//!
//! End offsets are relative to the start of the first field body. A NULL
//! field stores no body; a NULL variable-length field repeats the previous
//! end offset.

mod builder;
mod layout;

pub use builder::RecordBuilder;
pub use layout::{FieldKind, FieldTemplate, RecordLayout, RecordLayoutInner};
use smallvec::SmallVec;

use crate::{EncodedKey, RecordError, Tuple, encoding::keycode};

pub(crate) const HEADER_SIZE: usize = 3;
pub(crate) const INFO_DELETED: u8 = 0x20;

/// Sets or clears the delete mark of an encoded record in place.
pub fn set_delete_mark(bytes: &mut [u8], deleted: bool) {
	if let Some(info) = bytes.first_mut() {
		if deleted {
			*info |= INFO_DELETED;
		} else {
			*info &= !INFO_DELETED;
		}
	}
}

/// A stored record decoded against its index template. Field slices borrow
/// the record bytes and stay valid only as long as those bytes do.
#[derive(Debug, Clone)]
pub struct Record<'a> {
	bytes: &'a [u8],
	deleted: bool,
	spans: SmallVec<[Option<(usize, usize)>; 12]>,
	layout: &'a RecordLayout,
}

/// Field spans of a decoded record, detached from the borrow of its bytes.
/// [`RecordLayout::attach`] puts them back on the same bytes without decoding
/// again.
#[derive(Debug, Clone)]
pub struct RecordSpans {
	len: usize,
	deleted: bool,
	spans: SmallVec<[Option<(usize, usize)>; 12]>,
}

impl<'a> Record<'a> {
	pub fn detach(self) -> RecordSpans {
		RecordSpans {
			len: self.bytes.len(),
			deleted: self.deleted,
			spans: self.spans,
		}
	}

	pub fn n_fields(&self) -> usize {
		self.spans.len()
	}

	pub fn is_deleted(&self) -> bool {
		self.deleted
	}

	/// Body of field `i`, `None` for SQL NULL or a position past the end.
	pub fn field(&self, i: usize) -> Option<&'a [u8]> {
		let bytes = self.bytes;
		self.spans.get(i).copied().flatten().map(|(start, end)| &bytes[start..end])
	}

	pub fn is_null(&self, i: usize) -> bool {
		matches!(self.spans.get(i), Some(None))
	}

	/// Stored length of field `i`, `None` for SQL NULL.
	pub fn len(&self, i: usize) -> Option<usize> {
		self.field(i).map(<[u8]>::len)
	}

	pub fn read_bytes(&self, i: usize) -> Result<&'a [u8], RecordError> {
		if i >= self.n_fields() {
			return Err(RecordError::FieldOutOfRange {
				pos: i,
				n_fields: self.n_fields(),
			});
		}
		self.field(i).ok_or_else(|| RecordError::UnexpectedNull {
			field: self.layout.field_name(i).to_string(),
			pos: i,
		})
	}

	pub fn read_u32(&self, i: usize) -> Result<u32, RecordError> {
		let bytes = self.read_sized::<4>(i)?;
		Ok(u32::from_be_bytes(bytes))
	}

	pub fn read_u64(&self, i: usize) -> Result<u64, RecordError> {
		let bytes = self.read_sized::<8>(i)?;
		Ok(u64::from_be_bytes(bytes))
	}

	pub fn read_str(&self, i: usize) -> Result<&'a str, RecordError> {
		let bytes = self.read_bytes(i)?;
		std::str::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8 {
			field: self.layout.field_name(i).to_string(),
			pos: i,
		})
	}

	fn read_sized<const N: usize>(&self, i: usize) -> Result<[u8; N], RecordError> {
		let bytes = self.read_bytes(i)?;
		bytes.try_into().map_err(|_| RecordError::FieldLength {
			field: self.layout.field_name(i).to_string(),
			pos: i,
			expected: N,
			actual: bytes.len(),
		})
	}

	/// Encoded key over the first `n_uniq` fields.
	pub fn key(&self, n_uniq: usize) -> EncodedKey {
		let mut output = Vec::new();
		for i in 0..n_uniq.min(self.n_fields()) {
			keycode::encode_field(&mut output, self.field(i));
		}
		EncodedKey::new(output)
	}

	/// Whether the first `prefix.len()` fields equal the tuple byte for byte.
	pub fn starts_with(&self, prefix: &Tuple) -> bool {
		if prefix.len() > self.n_fields() {
			return false;
		}
		prefix.iter().enumerate().all(|(i, value)| self.field(i) == value)
	}

	pub fn layout(&self) -> &'a RecordLayout {
		self.layout
	}

	pub fn as_bytes(&self) -> &'a [u8] {
		self.bytes
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn layout() -> RecordLayout {
		RecordLayout::new([
			FieldTemplate::variable("NAME").not_null(),
			FieldTemplate::fixed("N", 4),
			FieldTemplate::variable("NOTE"),
		])
	}

	#[test]
	fn test_decode_fields() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "mydb/t1").set_u32(1, 7).set(2, "x").build().unwrap();

		let record = layout.decode(&bytes).unwrap();
		assert_eq!(record.n_fields(), 3);
		assert!(!record.is_deleted());
		assert_eq!(record.read_str(0).unwrap(), "mydb/t1");
		assert_eq!(record.read_u32(1).unwrap(), 7);
		assert_eq!(record.len(2), Some(1));
	}

	#[test]
	fn test_null_fields() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "a").set_null(1).set_null(2).build().unwrap();

		let record = layout.decode(&bytes).unwrap();
		assert!(record.is_null(1));
		assert!(record.is_null(2));
		assert_eq!(record.field(2), None);
		assert!(matches!(record.read_u32(1), Err(RecordError::UnexpectedNull { pos: 1, .. })));
	}

	#[test]
	fn test_attach_detached_spans() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "mydb/t1").set_u32(1, 7).set_null(2).build().unwrap();
		let spans = layout.decode(&bytes).unwrap().detach();

		let record = layout.attach(&bytes, spans.clone()).unwrap();
		assert_eq!(record.read_str(0).unwrap(), "mydb/t1");
		assert_eq!(record.read_u32(1).unwrap(), 7);
		assert!(record.is_null(2));

		// other bytes are decoded afresh
		let other = RecordBuilder::new(&layout).set(0, "mydb/t22").set_u32(1, 8).set(2, "x").build().unwrap();
		let record = layout.attach(&other, spans).unwrap();
		assert_eq!(record.read_str(0).unwrap(), "mydb/t22");
		assert_eq!(record.read_str(2).unwrap(), "x");
	}

	#[test]
	fn test_delete_mark() {
		let layout = layout();
		let mut bytes = RecordBuilder::new(&layout).set(0, "a").set_u32(1, 1).set(2, "").build().unwrap();
		set_delete_mark(&mut bytes, true);
		assert!(layout.decode(&bytes).unwrap().is_deleted());
		set_delete_mark(&mut bytes, false);
		assert!(!layout.decode(&bytes).unwrap().is_deleted());

		let marked =
			RecordBuilder::new(&layout).set(0, "a").set_u32(1, 1).set(2, "").delete_marked(true).build().unwrap();
		assert!(layout.decode(&marked).unwrap().is_deleted());
	}

	#[test]
	fn test_wrong_field_length() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "a").set_u32(1, 1).set(2, "abc").build().unwrap();
		let record = layout.decode(&bytes).unwrap();
		assert!(matches!(
			record.read_u64(1),
			Err(RecordError::FieldLength {
				expected: 8,
				actual: 4,
				..
			})
		));
		assert!(matches!(record.read_u32(5), Err(RecordError::FieldOutOfRange { pos: 5, n_fields: 3 })));
	}

	#[test]
	fn test_rejects_truncated_header() {
		assert!(matches!(layout().decode(&[0x00, 0x00]), Err(RecordError::TooShort { .. })));
	}

	#[test]
	fn test_rejects_field_count_mismatch() {
		let other = RecordLayout::new([FieldTemplate::variable("NAME")]);
		let bytes = RecordBuilder::new(&other).set(0, "a").build().unwrap();
		assert!(matches!(
			layout().decode(&bytes),
			Err(RecordError::FieldCountMismatch {
				expected: 3,
				actual: 1
			})
		));
	}

	#[test]
	fn test_rejects_trailing_bytes() {
		let layout = layout();
		let mut bytes = RecordBuilder::new(&layout).set(0, "a").set_u32(1, 1).set(2, "b").build().unwrap();
		bytes.push(0xff);
		assert!(matches!(layout.decode(&bytes), Err(RecordError::TrailingBytes { .. })));
	}

	#[test]
	fn test_rejects_offset_past_end() {
		let layout = layout();
		let mut bytes = RecordBuilder::new(&layout).set(0, "a").set_u32(1, 1).set(2, "b").build().unwrap();
		// first end offset sits right after the one-byte null bitmap
		bytes[4] = 0x00;
		bytes[5] = 0x40;
		assert!(matches!(layout.decode(&bytes), Err(RecordError::BadFieldOffset { pos: 0, .. })));
	}

	#[test]
	fn test_rejects_null_in_not_null_field() {
		let layout = layout();
		let mut bytes = RecordBuilder::new(&layout).set(0, "").set_u32(1, 1).set(2, "b").build().unwrap();
		bytes[3] |= 0x01;
		assert!(matches!(layout.decode(&bytes), Err(RecordError::NullInNotNullField { pos: 0, .. })));
	}

	#[test]
	fn test_starts_with() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "db/t1").set_u32(1, 9).set(2, "n").build().unwrap();
		let record = layout.decode(&bytes).unwrap();

		assert!(record.starts_with(&Tuple::new()));
		assert!(record.starts_with(&Tuple::single("db/t1")));
		assert!(!record.starts_with(&Tuple::single("db/t")));
		assert!(!record.starts_with(&Tuple::single("DB/T1")));
		assert!(record.starts_with(&Tuple::single("db/t1").with(9u32.to_be_bytes())));
	}

	#[test]
	fn test_key_matches_tuple_encoding() {
		let layout = layout();
		let bytes = RecordBuilder::new(&layout).set(0, "db/t1").set_u32(1, 9).set(2, "n").build().unwrap();
		let record = layout.decode(&bytes).unwrap();
		assert_eq!(record.key(2), Tuple::single("db/t1").with(9u32.to_be_bytes()).encode());
		assert_eq!(record.key(1), Tuple::single("db/t1").encode());
	}
}
