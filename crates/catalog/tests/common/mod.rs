// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use sysdict_catalog::{DictConfig, DictSystem};
use sysdict_store::{FilConfig, FilSystem};
use sysdict_sub_tracing::TracingBuilder;
use sysdict_testing::{ForeignKeyToCreate, IndexToCreate, TableToCreate, TestDictionary};

pub fn init_tracing() {
	let _ = TracingBuilder::new().with_filter("debug").with_test_writer().try_init();
}

pub fn fil(data_dir: &Path) -> Arc<FilSystem> {
	Arc::new(FilSystem::new(FilConfig::new(data_dir)))
}

pub fn boot(dictionary: &TestDictionary, fil: Arc<FilSystem>) -> DictSystem {
	boot_with(dictionary, fil, DictConfig::default())
}

pub fn boot_with(dictionary: &TestDictionary, fil: Arc<FilSystem>, config: DictConfig) -> DictSystem {
	init_tracing();
	DictSystem::boot(dictionary.pool().clone(), fil, config).unwrap()
}

/// `mydb/t1` (id 42, space 17): `a INT, b VARCHAR(10), c INT`, clustered
/// `PRIMARY(a)` with id 100 and root page 5.
pub fn t1() -> TableToCreate {
	TableToCreate::new("mydb/t1")
		.id(42)
		.space(17)
		.int_not_null("a")
		.varchar("b", 10)
		.int("c")
		.index(IndexToCreate::clustered("PRIMARY", &["a"]).id(100).page_no(5))
}

pub fn customers() -> TableToCreate {
	TableToCreate::new("mydb/customers").int_not_null("id").index(IndexToCreate::clustered("PRIMARY", &["id"]))
}

pub fn orders() -> TableToCreate {
	TableToCreate::new("mydb/orders")
		.int_not_null("id")
		.int("cust_id")
		.index(IndexToCreate::clustered("PRIMARY", &["id"]))
		.index(IndexToCreate::secondary("cust_idx", &["cust_id"]))
}

pub fn orders_fk() -> ForeignKeyToCreate {
	ForeignKeyToCreate::new("mydb/orders_ibfk_1", "mydb/orders", "mydb/customers").column("cust_id", "id")
}
