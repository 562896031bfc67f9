// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use sysdict_core::{
	Tuple,
	catalog::{IndexDef, TableDef},
	record::{Record, RecordLayout},
};
use sysdict_store::{BufferPool, PersistentCursor, SearchMode};
use sysdict_type::Result;
use tracing::error;

use crate::CatalogError;

/// What a scan does with delete-marked records inside its range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteMarked {
	/// Pass over them, as a read of the latest visible rows does.
	Skip,
	/// Fail with [`CatalogError::DeleteMarkedRecord`].
	Reject,
	/// Return them; the caller checks [`Record::is_deleted`].
	Include,
}

/// Walks the records of one index whose leading fields equal a prefix, in
/// key order.
///
/// A scan may be [suspended](Self::suspend) to release its
/// mini-transaction while the caller does slow work, and
/// [resumed](Self::resume) afterwards. When the record it stood on is gone
/// by then, it continues from the next one.
#[derive(Debug)]
pub struct PrefixScan {
	cursor: PersistentCursor,
	layout: RecordLayout,
	prefix: Tuple,
	policy: DeleteMarked,
	table: String,
	index: String,
	advance: bool,
	done: bool,
}

enum Step {
	Yield,
	Skip,
	Deleted,
	End,
}

impl PrefixScan {
	/// An empty `prefix` walks the whole index.
	pub fn open(
		pool: &BufferPool,
		table: &TableDef,
		index: &IndexDef,
		prefix: Tuple,
		policy: DeleteMarked,
	) -> Result<Self> {
		let layout = index.record_layout(table)?;
		let cursor = PersistentCursor::open_on_user_rec(pool, index.root(), &prefix, SearchMode::GreaterOrEqual)?;
		Ok(Self {
			cursor,
			layout,
			prefix,
			policy,
			table: table.name.clone(),
			index: index.name.clone(),
			advance: false,
			done: false,
		})
	}

	pub fn next(&mut self) -> Result<Option<Record<'_>>> {
		let spans = loop {
			if self.done {
				return Ok(None);
			}
			if self.advance {
				self.cursor.move_to_next_user_rec();
			}
			self.advance = true;

			let Some(bytes) = self.cursor.get_rec() else {
				self.done = true;
				return Ok(None);
			};
			let record = self.layout.decode(bytes)?;
			let step = if !record.starts_with(&self.prefix) {
				Step::End
			} else if !record.is_deleted() {
				Step::Yield
			} else {
				match self.policy {
					DeleteMarked::Skip => Step::Skip,
					DeleteMarked::Reject => Step::Deleted,
					DeleteMarked::Include => Step::Yield,
				}
			};

			match step {
				// the record's borrow of the cursor cannot leave the loop
				Step::Yield => break record.detach(),
				Step::Skip => continue,
				Step::End => {
					self.done = true;
					return Ok(None);
				}
				Step::Deleted => {
					error!(table = %self.table, index = %self.index, "delete-marked record in data dictionary");
					return Err(CatalogError::DeleteMarkedRecord {
						table: self.table.clone(),
						index: self.index.clone(),
					}
					.into());
				}
			}
		};

		match self.cursor.get_rec() {
			Some(bytes) => Ok(Some(self.layout.attach(bytes, spans)?)),
			None => Ok(None),
		}
	}

	/// Remembers the position and commits the mini-transaction. Records
	/// returned before cannot outlive this call.
	pub fn suspend(&mut self) {
		self.cursor.store_position();
		self.cursor.commit();
	}

	pub fn resume(&mut self) -> Result<()> {
		let exact = self.cursor.restore_position()?;
		if !exact {
			// already on the successor of the record last returned
			self.advance = false;
		}
		Ok(())
	}

	pub fn close(self) {
		self.cursor.close();
	}
}

#[cfg(test)]
mod tests {
	use sysdict_core::{
		Tuple,
		catalog::{IndexType, TableDef},
		record::RecordBuilder,
	};
	use sysdict_type::{IndexId, MainType, PageNo, PreciseType, SpaceId, TableId};

	use super::*;

	struct Fixture {
		pool: BufferPool,
		table: TableDef,
	}

	impl Fixture {
		fn new(rows: &[(u32, u32, &str, bool)]) -> Self {
			let pool = BufferPool::new();
			let page = pool.allocate_page(SpaceId::SYSTEM);
			let mut table = TableDef::new(TableId(2), "SYS_TEST", SpaceId::SYSTEM, 3);
			table.add_column("K", MainType::INT, PreciseType(0), 4, 0);
			table.add_column("POS", MainType::INT, PreciseType(0), 4, 0);
			table.add_column("NAME", MainType::BINARY, PreciseType(0), 0, 0);
			table.add_system_columns();
			let mut index =
				IndexDef::new(IndexId(2), "CLUST_IND", table.id, SpaceId::SYSTEM, IndexType(3), 2, page.page_no);
			index.add_field("K", 0);
			index.add_field("POS", 0);
			table.indexes.push(index);

			let layout = table.indexes[0].record_layout(&table).unwrap();
			pool.create_tree(page, layout.clone(), 2).unwrap();
			for &(k, pos, name, deleted) in rows {
				let row = RecordBuilder::new(&layout)
					.set_u32(0, k)
					.set_u32(1, pos)
					.set(2, [0u8; 6])
					.set(3, [0u8; 7])
					.set(4, name)
					.delete_marked(deleted)
					.build()
					.unwrap();
				pool.insert(page, row).unwrap();
			}
			Self {
				pool,
				table,
			}
		}

		fn scan(&self, prefix: Tuple, policy: DeleteMarked) -> PrefixScan {
			PrefixScan::open(&self.pool, &self.table, &self.table.indexes[0], prefix, policy).unwrap()
		}

		fn names(&self, prefix: Tuple, policy: DeleteMarked) -> Vec<String> {
			let mut scan = self.scan(prefix, policy);
			let mut names = Vec::new();
			while let Some(record) = scan.next().unwrap() {
				names.push(record.read_str(4).unwrap().to_string());
			}
			names
		}
	}

	fn key(k: u32) -> Tuple {
		Tuple::single(k.to_be_bytes())
	}

	#[test]
	fn test_stops_at_end_of_prefix() {
		let fixture = Fixture::new(&[(1, 0, "x", false), (2, 0, "a", false), (2, 1, "b", false), (3, 0, "y", false)]);
		assert_eq!(fixture.names(key(2), DeleteMarked::Reject), vec!["a", "b"]);
		assert!(fixture.names(key(4), DeleteMarked::Reject).is_empty());
		assert_eq!(fixture.names(Tuple::new(), DeleteMarked::Reject), vec!["x", "a", "b", "y"]);
	}

	#[test]
	fn test_delete_marked_policies() {
		let fixture = Fixture::new(&[(2, 0, "a", false), (2, 1, "b", true), (2, 2, "c", false)]);
		assert_eq!(fixture.names(key(2), DeleteMarked::Skip), vec!["a", "c"]);
		assert_eq!(fixture.names(key(2), DeleteMarked::Include), vec!["a", "b", "c"]);

		let mut scan = fixture.scan(key(2), DeleteMarked::Reject);
		assert!(scan.next().unwrap().is_some());
		let err = scan.next().unwrap_err();
		assert_eq!(err.code(), "DICT_007");
	}

	#[test]
	fn test_suspend_and_resume() {
		let fixture = Fixture::new(&[(2, 0, "a", false), (2, 1, "b", false), (2, 2, "c", false)]);
		let mut scan = fixture.scan(key(2), DeleteMarked::Skip);
		assert_eq!(scan.next().unwrap().unwrap().read_str(4).unwrap(), "a");
		scan.suspend();
		scan.resume().unwrap();
		assert_eq!(scan.next().unwrap().unwrap().read_str(4).unwrap(), "b");
		assert_eq!(scan.next().unwrap().unwrap().read_str(4).unwrap(), "c");
		assert!(scan.next().unwrap().is_none());
		assert!(scan.next().unwrap().is_none());
	}

	#[test]
	fn test_resume_after_current_record_removed() {
		let fixture = Fixture::new(&[(2, 0, "a", false), (2, 1, "b", false), (2, 2, "c", false)]);
		let mut scan = fixture.scan(key(2), DeleteMarked::Skip);
		scan.next().unwrap();
		assert_eq!(scan.next().unwrap().unwrap().read_str(4).unwrap(), "b");
		scan.suspend();

		let page = fixture.table.indexes[0].root();
		fixture.pool.remove(page, &key(2).with(1u32.to_be_bytes())).unwrap();
		scan.resume().unwrap();
		assert_eq!(scan.next().unwrap().unwrap().read_str(4).unwrap(), "c");
		assert!(scan.next().unwrap().is_none());
	}

	#[test]
	fn test_resume_past_range() {
		let fixture = Fixture::new(&[(2, 0, "a", false), (3, 0, "z", false)]);
		let mut scan = fixture.scan(key(2), DeleteMarked::Skip);
		scan.next().unwrap();
		scan.suspend();

		let page = fixture.table.indexes[0].root();
		fixture.pool.remove(page, &key(2).with(0u32.to_be_bytes())).unwrap();
		scan.resume().unwrap();
		assert!(scan.next().unwrap().is_none());
		scan.close();
	}

	#[test]
	fn test_freed_root() {
		let fixture = Fixture::new(&[]);
		let mut index = fixture.table.indexes[0].clone();
		index.page_no = PageNo(999);
		let err = PrefixScan::open(&fixture.pool, &fixture.table, &index, Tuple::new(), DeleteMarked::Skip).unwrap_err();
		assert_eq!(err.code(), "STORE_001");
	}
}
