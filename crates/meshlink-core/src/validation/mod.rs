//! Structural/schema validation and semantic-invariant checks for a loaded
//! [`MeshAssociativity`](crate::model::MeshAssociativity).
//!
//! The XML parser (see [`crate::parser`]) already rejects malformed
//! documents at the node level and records recoverable failures in a
//! [`crate::report::ParseReport`] (§7's collect-and-continue policy). This
//! module covers two concerns the parser does not:
//!
//! - **Schema validation** (§4.8): checking a document against an XSD
//!   before or independently of building the façade. Neither the teacher
//!   crate nor the rest of the retrieval pack depends on a full XSD
//!   engine, so [`schema::validate_against_schema`] implements the
//!   structural subset this format actually needs (root element name,
//!   required attributes, known child element names) rather than pulling
//!   in a general-purpose XSD validator — see DESIGN.md.
//! - **Semantic validation** (§8): the universal invariants a correctly
//!   built associativity graph must satisfy regardless of whether the
//!   document it came from was schema-valid — name uniqueness, the
//!   geometry-group common-entity rule, and cascade completeness. These
//!   are exposed as standalone checks in [`semantic`] so a caller (or the
//!   CLI's `check --strict`) can run them against an already-parsed
//!   façade without re-parsing.

pub mod schema;
pub mod semantic;

use serde::{Deserialize, Serialize};

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// One structural or semantic finding against a document or façade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationItem {
    pub severity: ValidationSeverity,
    pub message: String,
    /// What the finding is about, e.g. `"MeshFace f0 (sheet sh0)"`.
    pub context: String,
}

/// Accumulated findings from a schema or semantic validation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub items: Vec<ValidationItem>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.items.push(ValidationItem {
            severity: ValidationSeverity::Error,
            message: message.into(),
            context: context.into(),
        });
    }

    pub fn add_warning(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.items.push(ValidationItem {
            severity: ValidationSeverity::Warning,
            message: message.into(),
            context: context.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.items.extend(other.items);
    }
}

pub use schema::validate_against_schema;
pub use semantic::validate_semantic;
