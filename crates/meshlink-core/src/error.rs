//! Error handling for meshlink-core.
//!
//! ## Design Philosophy
//!
//! The library follows a strict no-panic policy:
//!
//! - All fallible operations return `Result<T, MeshLinkError>`, never panic.
//! - Malformed input (bad XML, unresolved references, duplicate ids) produces
//!   an error, not a panic.
//! - Parsing collects per-node failures into a [`crate::report::ParseReport`]
//!   and continues with the next sibling where that is safe; only a
//!   malformed root document or I/O failure aborts the whole parse.
//!
//! ## Error Kinds
//!
//! [`MeshLinkError`] covers the failure modes the associativity graph can
//! produce:
//!
//! - **Io**: the XML file (or schema file) could not be read.
//! - **ParseError**: malformed XML, a missing required attribute, an unknown
//!   `etype`, a `name` attribute on a `count > 1` block, or a base64 decode
//!   failure.
//! - **SchemaValidation**: the document failed structural/schema validation.
//! - **Duplicate**: an insert collided with an existing id, name, or
//!   reference string.
//! - **UnresolvedReference**: an attribute group, geometry group, transform,
//!   or mesh entity referenced a target that does not exist.
//! - **NotFound**: a query by id/name/ref/indices matched nothing.
//! - **KernelError**: a geometry kernel call failed, or no kernel is active.
//! - **DataSizeMismatch**: present for parity with the original ABI's
//!   primitive-size check; meaningful only to callers binding this crate
//!   through a C-compatible layer.
//!
//! ```
//! use meshlink_core::error::MeshLinkError;
//!
//! let error = MeshLinkError::NotFound("MeshPoint with index 17".to_string());
//! assert_eq!(error.to_string(), "not found: MeshPoint with index 17");
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshLinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("geometry kernel error: {0}")]
    KernelError(String),

    #[error("primitive size mismatch: {0}")]
    DataSizeMismatch(String),
}

pub type Result<T> = std::result::Result<T, MeshLinkError>;
