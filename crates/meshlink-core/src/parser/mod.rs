//! XML-to-`MeshAssociativity` parsing pipeline.
//!
//! [`xml_parser`] builds a small DOM (`XmlNode`) from the raw `quick_xml`
//! event stream. [`model_parser`] walks that tree in the fixed 7-pass
//! order §4.8 requires and assembles a [`crate::model::MeshAssociativity`]
//! façade. [`mesh_parser`] handles the element blocks nested inside a
//! `MeshSheet`/`MeshString`/`MeshModelReference` (`ParamVertex`,
//! `MeshFace`, `MeshEdge`).
//!
//! ```text
//! bytes → xml_parser::parse_document → XmlNode tree → model_parser::parse_mesh_link → MeshAssociativity
//! ```

pub mod mesh_parser;
pub mod model_parser;
pub mod xml_parser;

use crate::error::Result;
use crate::model::MeshAssociativity;
use crate::report::ParseReport;
use std::io::BufRead;
use std::path::PathBuf;

/// Options controlling how a `MeshLink` document is parsed (§12).
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Path to an XSD schema to validate the document against before
    /// building the façade. `None` skips schema validation entirely.
    pub schema_path: Option<PathBuf>,
    /// Whether to run the crate's own structural validation pass
    /// (see [`crate::validation`]) after the façade is built.
    pub validate: bool,
}

/// Parses a complete `MeshLink` document, returning the populated façade
/// and a report of any per-node diagnostics collected along the way.
pub fn parse_mesh_link<R: BufRead>(reader: R, options: &ParserOptions) -> Result<(MeshAssociativity, ParseReport)> {
    model_parser::parse_mesh_link(reader, options)
}
