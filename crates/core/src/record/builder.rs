// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use smallvec::{SmallVec, smallvec};

use super::{HEADER_SIZE, INFO_DELETED, RecordLayout, layout::FieldKind};
use crate::RecordError;

/// Encodes a record for a given template. Every field must be set, either
/// to a value or to SQL NULL.
#[derive(Debug)]
pub struct RecordBuilder<'l> {
	layout: &'l RecordLayout,
	values: SmallVec<[Option<Option<Vec<u8>>>; 12]>,
	deleted: bool,
	out_of_range: Option<usize>,
}

impl<'l> RecordBuilder<'l> {
	pub fn new(layout: &'l RecordLayout) -> Self {
		Self {
			layout,
			values: smallvec![None; layout.n_fields()],
			deleted: false,
			out_of_range: None,
		}
	}

	fn put(mut self, i: usize, value: Option<Vec<u8>>) -> Self {
		match self.values.get_mut(i) {
			Some(slot) => *slot = Some(value),
			None => {
				self.out_of_range.get_or_insert(i);
			}
		}
		self
	}

	pub fn set(self, i: usize, value: impl AsRef<[u8]>) -> Self {
		self.put(i, Some(value.as_ref().to_vec()))
	}

	pub fn set_u32(self, i: usize, value: u32) -> Self {
		self.put(i, Some(value.to_be_bytes().to_vec()))
	}

	pub fn set_u64(self, i: usize, value: u64) -> Self {
		self.put(i, Some(value.to_be_bytes().to_vec()))
	}

	pub fn set_null(self, i: usize) -> Self {
		self.put(i, None)
	}

	pub fn delete_marked(mut self, deleted: bool) -> Self {
		self.deleted = deleted;
		self
	}

	pub fn build(self) -> Result<Vec<u8>, RecordError> {
		if let Some(pos) = self.out_of_range {
			return Err(RecordError::FieldOutOfRange {
				pos,
				n_fields: self.layout.n_fields(),
			});
		}

		let n_fields = self.layout.n_fields();
		let mut bitmap = vec![0u8; self.layout.bitmap_size];
		let mut offsets = Vec::with_capacity(2 * self.layout.n_variable);
		let mut data = Vec::new();

		for (pos, (field, value)) in self.layout.fields.iter().zip(self.values.iter()).enumerate() {
			let value = value.as_ref().ok_or_else(|| RecordError::MissingValue {
				field: field.name.clone(),
				pos,
			})?;

			match value {
				None => {
					if !field.nullable {
						return Err(RecordError::NullInNotNullField {
							field: field.name.clone(),
							pos,
						});
					}
					bitmap[pos / 8] |= 1 << (pos % 8);
				}
				Some(bytes) => {
					if let FieldKind::Fixed(size) = field.kind {
						if bytes.len() != size {
							return Err(RecordError::FieldLength {
								field: field.name.clone(),
								pos,
								expected: size,
								actual: bytes.len(),
							});
						}
					}
					data.extend_from_slice(bytes);
				}
			}

			if field.kind == FieldKind::Variable {
				let end = u16::try_from(data.len()).map_err(|_| RecordError::FieldTooLong {
					field: field.name.clone(),
					pos,
					len: value.as_ref().map(Vec::len).unwrap_or(0),
				})?;
				offsets.extend_from_slice(&end.to_be_bytes());
			}
		}

		let mut output = Vec::with_capacity(HEADER_SIZE + bitmap.len() + offsets.len() + data.len());
		output.push(if self.deleted {
			INFO_DELETED
		} else {
			0
		});
		output.extend_from_slice(&(n_fields as u16).to_be_bytes());
		output.extend_from_slice(&bitmap);
		output.extend_from_slice(&offsets);
		output.extend_from_slice(&data);
		Ok(output)
	}
}
