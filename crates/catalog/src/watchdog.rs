// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use tracing::debug;

/// The fatal semaphore wait threshold, in whole seconds, shared with
/// whatever monitors latch waits.
#[derive(Debug)]
pub struct SemaphoreWatchdog {
	threshold_secs: AtomicU64,
}

impl SemaphoreWatchdog {
	pub fn new(threshold: Duration) -> Self {
		Self {
			threshold_secs: AtomicU64::new(threshold.as_secs()),
		}
	}

	pub fn threshold(&self) -> Duration {
		Duration::from_secs(self.threshold_secs.load(Ordering::Acquire))
	}

	/// Raises the threshold by `by` until the returned guard is dropped.
	pub fn extend(&self, by: Duration) -> WatchdogExtension<'_> {
		let secs = by.as_secs();
		let previous = self.threshold_secs.fetch_add(secs, Ordering::AcqRel);
		debug!(threshold_secs = previous + secs, "extended fatal semaphore wait threshold");
		WatchdogExtension {
			watchdog: self,
			secs,
		}
	}
}

#[must_use = "the extension ends when the guard is dropped"]
#[derive(Debug)]
pub struct WatchdogExtension<'a> {
	watchdog: &'a SemaphoreWatchdog,
	secs: u64,
}

impl Drop for WatchdogExtension<'_> {
	fn drop(&mut self) {
		self.watchdog.threshold_secs.fetch_sub(self.secs, Ordering::AcqRel);
	}
}
