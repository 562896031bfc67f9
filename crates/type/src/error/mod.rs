// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod diagnostic;

/// A structured, operator-facing description of a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn with_cause(mut self, cause: Diagnostic) -> Self {
		self.cause = Some(Box::new(cause));
		self
	}

	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.notes.push(note.into());
		self
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] {}", self.code, self.message)?;
		if let Some(label) = &self.label {
			write!(f, " ({})", label)?;
		}
		for note in &self.notes {
			write!(f, "\n  note: {}", note)?;
		}
		if let Some(help) = &self.help {
			write!(f, "\n  help: {}", help)?;
		}
		if let Some(cause) = &self.cause {
			write!(f, "\n  caused by: {}", cause)?;
		}
		Ok(())
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Error {
	pub fn new(diagnostic: impl IntoDiagnostic) -> Self {
		Self(Box::new(diagnostic.into_diagnostic()))
	}

	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}

	pub fn message(&self) -> &str {
		&self.0.message
	}
}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Self(Box::new(diagnostic))
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl std::error::Error for Error {}

/// Builds an internal-error diagnostic that records where it was raised.
#[macro_export]
macro_rules! internal {
	($reason:expr) => {
		$crate::error::diagnostic::internal::internal_with_context(
			$reason,
			file!(),
			line!(),
		)
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::error::diagnostic::internal::internal_with_context(
			&format!($fmt, $($arg)*),
			file!(),
			line!(),
		)
	};
}

/// Returns early with the given diagnostic (or anything that converts into one).
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::error::Error::new($diagnostic))
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_includes_code_and_help() {
		let diagnostic = Diagnostic {
			code: "DICT_999".to_string(),
			message: "something broke".to_string(),
			label: None,
			help: Some("check the data dictionary".to_string()),
			notes: vec![],
			cause: None,
		};
		let rendered = Error::from(diagnostic).to_string();
		assert!(rendered.starts_with("[DICT_999] something broke"));
		assert!(rendered.contains("help: check the data dictionary"));
	}

	#[test]
	fn test_internal_macro_records_location() {
		let diagnostic = internal!("unexpected state {}", 7);
		assert_eq!(diagnostic.code, "INTERNAL_ERROR");
		assert!(diagnostic.message.contains("unexpected state 7"));
		assert!(diagnostic.notes.iter().any(|n| n.contains("mod.rs")));
	}

	#[test]
	fn test_return_error_macro() {
		fn fails() -> crate::Result<()> {
			return_error!(internal!("boom"));
		}
		assert_eq!(fails().unwrap_err().code(), "INTERNAL_ERROR");
	}
}
