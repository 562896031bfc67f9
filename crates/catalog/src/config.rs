// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

/// Configuration of the dictionary loader.
#[derive(Debug, Clone)]
pub struct DictConfig {
	/// Charset-collation given to non-binary string columns whose stored
	/// precise type carries none.
	pub default_charset_coll: u32,
	/// How long a thread may wait on a latch before the server considers
	/// itself hung.
	pub fatal_semaphore_wait_threshold: Duration,
	/// Added to the wait threshold while every table is being printed.
	pub print_wait_extension: Duration,
	/// Fail a table load when one of its foreign key constraints cannot be
	/// resolved, instead of logging a warning.
	pub strict_foreign_keys: bool,
}

impl Default for DictConfig {
	fn default() -> Self {
		Self {
			default_charset_coll: 8,
			fatal_semaphore_wait_threshold: Duration::from_secs(600),
			print_wait_extension: Duration::from_secs(7200),
			strict_foreign_keys: false,
		}
	}
}

impl DictConfig {
	pub fn with_default_charset_coll(mut self, charset_coll: u32) -> Self {
		self.default_charset_coll = charset_coll;
		self
	}

	pub fn with_fatal_semaphore_wait_threshold(mut self, threshold: Duration) -> Self {
		self.fatal_semaphore_wait_threshold = threshold;
		self
	}

	pub fn with_print_wait_extension(mut self, extension: Duration) -> Self {
		self.print_wait_extension = extension;
		self
	}

	pub fn with_strict_foreign_keys(mut self, strict: bool) -> Self {
		self.strict_foreign_keys = strict;
		self
	}
}
