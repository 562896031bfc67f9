// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use std::path::Path;

use common::{boot, fil};
use sysdict_catalog::DictSystem;
use sysdict_core::catalog::TableDef;
use sysdict_testing::{IndexToCreate, TableToCreate, TestDictionary};
use sysdict_type::{Error, PageNo, SpaceId, TableId};

fn three_columns(name: &str) -> TableToCreate {
	TableToCreate::new(name).int_not_null("a").int("b").int("c").index(IndexToCreate::clustered("PRIMARY", &["a"]))
}

fn load_err(system: &DictSystem, name: &str) -> Error {
	let mut guard = system.lock();
	let err = guard.load_table(name).unwrap_err();
	assert!(guard.cache().table_by_name(name).is_none(), "{} was cached after failing to load", name);
	err
}

#[test]
fn test_first_index_not_clustered() {
	let dictionary = TestDictionary::new().unwrap();
	dictionary
		.create_table(TableToCreate::new("mydb/t4").int("a").index(IndexToCreate::secondary("a_idx", &["a"])))
		.unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	let err = load_err(&system, "mydb/t4");
	assert_eq!(err.code(), "DICT_006");
	assert!(err.message().contains("is not clustered"));
}

#[test]
fn test_freed_index_tree() {
	let dictionary = TestDictionary::new().unwrap();
	dictionary
		.create_table(
			TableToCreate::new("mydb/t")
				.int_not_null("a")
				.int("b")
				.index(IndexToCreate::clustered("PRIMARY", &["a"]))
				.index(IndexToCreate::secondary("b_idx", &["b"]).page_no(PageNo::NIL.0)),
		)
		.unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	let err = load_err(&system, "mydb/t");
	assert_eq!(err.code(), "DICT_005");
	assert!(err.message().contains("b_idx"));
}

#[test]
fn test_delete_marked_column_row() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	dictionary.mark_column_deleted(table.id, 1).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_007");
}

#[test]
fn test_column_row_gap() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	dictionary.remove_column(table.id, 1).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_001");
}

#[test]
fn test_column_rows_missing() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	dictionary.remove_column(table.id, 2).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_002");
}

#[test]
fn test_delete_marked_index_row() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary
		.create_table(
			TableToCreate::new("mydb/t")
				.int_not_null("a")
				.int("b")
				.index(IndexToCreate::clustered("PRIMARY", &["a"]))
				.index(IndexToCreate::secondary("b_idx", &["b"])),
		)
		.unwrap();
	dictionary.mark_index_deleted(table.id, table.indexes[1].id).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_007");
}

#[test]
fn test_delete_marked_field_row() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	dictionary.mark_field_deleted(table.indexes[0].id, 0).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_018");
}

#[test]
fn test_missing_field_row() {
	let dictionary = TestDictionary::new().unwrap();
	dictionary
		.create_table(
			TableToCreate::new("mydb/t").int_not_null("a").index(IndexToCreate::clustered("PRIMARY", &["a"]).n_fields(2)),
		)
		.unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_004");
}

#[test]
fn test_field_row_out_of_sequence() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary
		.create_table(
			TableToCreate::new("mydb/t").int_not_null("a").int_not_null("b").index(IndexToCreate::clustered("PRIMARY", &["a", "b"])),
		)
		.unwrap();
	dictionary.rewrite_field_pos(table.indexes[0].id, 1, 5, "b").unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	let err = load_err(&system, "mydb/t");
	assert_eq!(err.code(), "DICT_003");
	assert!(err.message().contains("PRIMARY"));
}

#[test]
fn test_index_field_count_out_of_range() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	let mut index = table.indexes[0].clone();
	index.n_fields = 0xFFFF_FFFF;
	dictionary.rewrite_index(&index).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	let err = load_err(&system, "mydb/t");
	assert_eq!(err.code(), "DICT_024");
	assert!(err.message().contains("4294967295 fields"));
}

#[test]
fn test_column_count_out_of_range() {
	let dictionary = TestDictionary::new().unwrap();
	let mut table = TableDef::new(TableId(900), "mydb/huge", SpaceId::SYSTEM, 0);
	table.add_system_columns();
	table.n_cols = 0x7FFF_0000;
	dictionary.write_table(&table).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/huge").code(), "DICT_023");
}

#[test]
fn test_unknown_table_type() {
	let dictionary = TestDictionary::new().unwrap();
	dictionary.create_table(three_columns("mydb/t").table_type(7)).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_009");
}

#[test]
fn test_cluster_member_unsupported() {
	let dictionary = TestDictionary::new().unwrap();
	dictionary.create_table(three_columns("mydb/t").table_type(2)).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_008");
}

#[test]
fn test_failed_load_is_retried() {
	let dictionary = TestDictionary::new().unwrap();
	let table = dictionary.create_table(three_columns("mydb/t")).unwrap();
	dictionary.remove_column(table.id, 2).unwrap();
	let system = boot(&dictionary, fil(Path::new(".")));

	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_002");
	assert_eq!(load_err(&system, "mydb/t").code(), "DICT_002");

	// the cache is left usable
	let mut guard = system.lock();
	assert_eq!(guard.cache().len(), 4);
	assert!(guard.load_table("SYS_FOREIGN").unwrap().is_some());
	assert_eq!(guard.cache().len(), 5);
}
