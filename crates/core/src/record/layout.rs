// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use smallvec::SmallVec;

use super::{HEADER_SIZE, INFO_DELETED, Record, RecordSpans};
use crate::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Stored size comes from the template.
	Fixed(usize),
	/// Stored size comes from the record's end-offset array.
	Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
	pub name: String,
	pub kind: FieldKind,
	pub nullable: bool,
}

impl FieldTemplate {
	pub fn fixed(name: impl Into<String>, size: usize) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Fixed(size),
			nullable: true,
		}
	}

	pub fn variable(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Variable,
			nullable: true,
		}
	}

	pub fn not_null(mut self) -> Self {
		self.nullable = false;
		self
	}
}

/// Field template of one index: how its stored records are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout(Arc<RecordLayoutInner>);

impl Deref for RecordLayout {
	type Target = RecordLayoutInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct RecordLayoutInner {
	pub fields: Vec<FieldTemplate>,
	pub bitmap_size: usize,
	pub n_variable: usize,
}

impl RecordLayout {
	pub fn new(fields: impl IntoIterator<Item = FieldTemplate>) -> Self {
		let fields: Vec<FieldTemplate> = fields.into_iter().collect();
		let bitmap_size = fields.len().div_ceil(8);
		let n_variable = fields.iter().filter(|f| f.kind == FieldKind::Variable).count();
		Self(Arc::new(RecordLayoutInner {
			fields,
			bitmap_size,
			n_variable,
		}))
	}
}

impl RecordLayoutInner {
	pub fn n_fields(&self) -> usize {
		self.fields.len()
	}

	/// Offset of the first field body.
	pub fn data_offset(&self) -> usize {
		HEADER_SIZE + self.bitmap_size + 2 * self.n_variable
	}

	pub fn field_name(&self, i: usize) -> &str {
		self.fields.get(i).map(|f| f.name.as_str()).unwrap_or("?")
	}

	pub fn position(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|f| f.name == name)
	}
}

impl RecordLayout {
	/// Rebuilds a record from spans detached off a decode of the same bytes.
	/// Bytes of another length are decoded afresh.
	pub fn attach<'a>(&'a self, bytes: &'a [u8], spans: RecordSpans) -> Result<Record<'a>, RecordError> {
		if bytes.len() != spans.len || spans.spans.len() != self.n_fields() {
			return self.decode(bytes);
		}
		Ok(Record {
			bytes,
			deleted: spans.deleted,
			spans: spans.spans,
			layout: self,
		})
	}

	/// Validates a stored record against this template and locates each
	/// field body.
	pub fn decode<'a>(&'a self, bytes: &'a [u8]) -> Result<Record<'a>, RecordError> {
		if bytes.len() < HEADER_SIZE {
			return Err(RecordError::TooShort {
				len: bytes.len(),
				needed: HEADER_SIZE,
			});
		}

		let info = bytes[0];
		let n_fields = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
		if n_fields != self.n_fields() {
			return Err(RecordError::FieldCountMismatch {
				expected: self.n_fields(),
				actual: n_fields,
			});
		}

		let data_offset = self.data_offset();
		if bytes.len() < data_offset {
			return Err(RecordError::TooShort {
				len: bytes.len(),
				needed: data_offset,
			});
		}

		let bitmap = &bytes[HEADER_SIZE..HEADER_SIZE + self.bitmap_size];
		let offsets = &bytes[HEADER_SIZE + self.bitmap_size..data_offset];
		let data_len = bytes.len() - data_offset;

		let mut spans = SmallVec::with_capacity(n_fields);
		let mut cursor = 0usize;
		let mut variable = 0usize;

		for (pos, field) in self.fields.iter().enumerate() {
			let is_null = bitmap[pos / 8] & (1 << (pos % 8)) != 0;
			if is_null && !field.nullable {
				return Err(RecordError::NullInNotNullField {
					field: field.name.clone(),
					pos,
				});
			}

			match field.kind {
				FieldKind::Variable => {
					let end = u16::from_be_bytes([offsets[2 * variable], offsets[2 * variable + 1]])
						as usize;
					variable += 1;

					if is_null {
						if end != cursor {
							return Err(RecordError::BadFieldOffset {
								field: field.name.clone(),
								pos,
							});
						}
						spans.push(None);
					} else {
						if end < cursor || end > data_len {
							return Err(RecordError::BadFieldOffset {
								field: field.name.clone(),
								pos,
							});
						}
						spans.push(Some((data_offset + cursor, data_offset + end)));
						cursor = end;
					}
				}
				FieldKind::Fixed(size) => {
					if is_null {
						spans.push(None);
					} else {
						if cursor + size > data_len {
							return Err(RecordError::TooShort {
								len: bytes.len(),
								needed: data_offset + cursor + size,
							});
						}
						spans.push(Some((data_offset + cursor, data_offset + cursor + size)));
						cursor += size;
					}
				}
			}
		}

		if cursor != data_len {
			return Err(RecordError::TrailingBytes {
				expected: cursor,
				actual: data_len,
			});
		}

		Ok(Record {
			bytes,
			deleted: info & INFO_DELETED != 0,
			spans,
			layout: self,
		})
	}
}
