//! # meshlink-cli
//!
//! Command-line tool for inspecting, validating, and round-tripping
//! MeshLink associativity files.
//!
//! ## Overview
//!
//! This crate provides the `meshlink` command-line tool built on top of
//! [`meshlink_core`]. While primarily a binary crate, it exposes its
//! command implementations as a library to enable programmatic usage and
//! testing.
//!
//! ## CLI Commands
//!
//! The `meshlink` binary supports the following commands:
//!
//! - **`check`**: parse (and optionally schema-validate) a file, reporting
//!   element counts and diagnostics; the Rust equivalent of the minimal
//!   diagnostic harness.
//! - **`roundtrip`**: parse, write back out, re-parse, and confirm element
//!   counts match.
//! - **`dump`**: print the parsed associativity graph's structure.
//! - **`find-point`** / **`find-edge`** / **`find-face`**: ad hoc queries
//!   exercising the lowest/highest topology lookup semantics directly.
//!
//! ## CLI Usage Examples
//!
//! ```bash
//! # Check a file, reporting diagnostics but never failing on them
//! meshlink check model.xml
//!
//! # Validate against an XSD and fail the process on any error
//! meshlink check model.xml --schema MeshLink.xsd --strict
//!
//! # Round-trip through a temp file
//! meshlink roundtrip model.xml
//!
//! # Look up a mesh point by index
//! meshlink find-point model.xml --index 42
//! ```
//!
//! ## Programmatic Usage
//!
//! The command implementations are exposed as public functions in the
//! [`commands`] module:
//!
//! ```no_run
//! use meshlink_cli::commands::{check, OutputFormat};
//! use std::path::PathBuf;
//!
//! # fn main() -> anyhow::Result<()> {
//! check(PathBuf::from("model.xml"), None, false, OutputFormat::Json)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-Reference
//!
//! This CLI tool is built on top of [`meshlink_core`], which provides the
//! underlying MeshLink associativity graph, XML parser/writer, and
//! validation passes. For the data model and file format, see the
//! `meshlink-core` documentation.

pub mod commands;
