// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the subscriber.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Format {
	#[default]
	Text,
	Json,
}

/// The global subscriber could not be installed.
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TracingError(String);

/// Builder for the process-wide tracing subscriber.
///
/// The filter uses `EnvFilter` directive syntax, e.g.
/// `"info,sysdict_catalog=debug"`. `RUST_LOG` wins when it is set.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	filter: String,
	format: Format,
	with_target: bool,
	test_writer: bool,
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			filter: "info".to_string(),
			format: Format::Text,
			with_target: true,
			test_writer: false,
		}
	}

	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	pub fn json(mut self) -> Self {
		self.format = Format::Json;
		self
	}

	pub fn with_target(mut self, with_target: bool) -> Self {
		self.with_target = with_target;
		self
	}

	/// Writes through libtest's capture, so log lines show only for
	/// failing tests.
	pub fn with_test_writer(mut self) -> Self {
		self.test_writer = true;
		self
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	pub fn format(&self) -> Format {
		self.format
	}

	fn env_filter(&self) -> EnvFilter {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
	}

	/// Installs the subscriber. Fails when one is already installed.
	pub fn try_init(self) -> Result<(), TracingError> {
		let registry = tracing_subscriber::registry().with(self.env_filter());
		let result = match (self.format, self.test_writer) {
			(Format::Text, false) => registry.with(fmt::layer().with_target(self.with_target)).try_init(),
			(Format::Text, true) => {
				registry.with(fmt::layer().with_target(self.with_target).with_test_writer()).try_init()
			}
			(Format::Json, false) => registry.with(fmt::layer().json().with_target(self.with_target)).try_init(),
			(Format::Json, true) => {
				registry.with(fmt::layer().json().with_target(self.with_target).with_test_writer()).try_init()
			}
		};
		result.map_err(|err| TracingError(err.to_string()))
	}
}
