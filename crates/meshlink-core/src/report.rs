//! Structured diagnostics collected while parsing.
//!
//! The parser's error policy (see [`crate::error`]) distinguishes a hard
//! failure (bad root document, I/O error) from a recoverable per-node
//! failure that should be reported but not abort the whole document. A
//! [`ParseReport`] accumulates the latter.

use crate::error::MeshLinkError;
use crate::validation::{ValidationReport, ValidationSeverity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub severity: Severity,
    pub message: String,
    /// The element or node the diagnostic was raised against, e.g.
    /// `"MeshFace (sheet /Base/sphere/outer)"`.
    pub context: String,
}

impl ParseDiagnostic {
    pub fn from_error(context: impl Into<String>, err: &MeshLinkError) -> Self {
        ParseDiagnostic {
            severity: Severity::Error,
            message: err.to_string(),
            context: context.into(),
        }
    }

    pub fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        ParseDiagnostic {
            severity: Severity::Warning,
            message: message.into(),
            context: context.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseReport {
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, context: impl Into<String>, err: &MeshLinkError) {
        self.diagnostics.push(ParseDiagnostic::from_error(context, err));
    }

    pub fn record_warning(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(ParseDiagnostic::warning(context, message));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn merge(&mut self, other: ParseReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Folds a [`ValidationReport`] (schema or semantic findings) into this
    /// report, so schema validation run during parsing (§12's
    /// `ParserOptions`) surfaces through the same diagnostic channel as
    /// per-node parse failures.
    pub fn extend_from_validation(&mut self, validation: ValidationReport) {
        for item in validation.items {
            let severity = match item.severity {
                ValidationSeverity::Error => Severity::Error,
                ValidationSeverity::Warning => Severity::Warning,
            };
            self.diagnostics.push(ParseDiagnostic {
                severity,
                message: item.message,
                context: item.context,
            });
        }
    }
}
