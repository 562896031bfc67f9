// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::super::Diagnostic;

pub fn internal_with_context(reason: &str, file: &str, line: u32) -> Diagnostic {
	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("internal error: {}", reason),
		label: Some("an invariant of the data dictionary code was violated".to_string()),
		help: Some("this is a bug, please report it together with the server log".to_string()),
		notes: vec![format!("raised at {}:{}", file, line)],
		cause: None,
	}
}
