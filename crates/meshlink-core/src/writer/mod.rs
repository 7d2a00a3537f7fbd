//! Serialization of a [`MeshAssociativity`](crate::model::mesh_associativity::MeshAssociativity)
//! back to a `MeshLink` XML document.
//!
//! ```text
//! MeshAssociativity → model_writer → quick_xml events → XML document
//! ```
//!
//! [`model_writer`] walks the façade in the fixed §4.9 order (attributes,
//! geometry, mesh files, transforms, linkages) and delegates the per-element
//! blocks inside a sheet or string to [`mesh_writer`]. [`xml_writer`] is the
//! thin `quick_xml::Writer` wrapper both build on.

pub mod mesh_writer;
pub mod model_writer;
pub mod xml_writer;

use crate::error::Result;
use crate::model::mesh_associativity::MeshAssociativity;
use std::io::Write;

/// Controls the shape of the emitted document: whether index-form mesh
/// elements are base64-encoded (§4.8's `format` attribute), the namespace
/// strings stamped on the document root, and the indent style (§4.9).
#[derive(Debug, Clone, PartialEq)]
pub struct WriterOptions {
    pub compress: bool,
    pub xmlns: String,
    pub xmlns_xsi: String,
    pub schema_location: String,
    /// `(indent character, indent width)`, passed straight through to
    /// `quick_xml::Writer::new_with_indent`.
    pub indent: (u8, usize),
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            compress: false,
            xmlns: "http://www.meshlink.org/schema/MeshLink".to_string(),
            xmlns_xsi: "http://www.w3.org/2001/XMLSchema-instance".to_string(),
            schema_location: "http://www.meshlink.org/schema/MeshLink MeshLink.xsd".to_string(),
            indent: (b' ', 2),
        }
    }
}

impl WriterOptions {
    /// Builds options that reproduce the namespace strings a parser
    /// captured off the original document root, for a faithful round trip.
    pub fn from_doc_meta(meta: &crate::model::mesh_associativity::XmlDocMeta) -> Self {
        let defaults = WriterOptions::default();
        WriterOptions {
            xmlns: meta.xmlns.clone().unwrap_or(defaults.xmlns),
            xmlns_xsi: meta.xmlns_xsi.clone().unwrap_or(defaults.xmlns_xsi),
            schema_location: meta.schema_location.clone().unwrap_or(defaults.schema_location),
            ..defaults
        }
    }
}

/// Writes `facade` as a complete `MeshLink` XML document to `writer`.
pub fn write_mesh_link<W: Write>(facade: &MeshAssociativity, writer: W, options: &WriterOptions) -> Result<()> {
    model_writer::write_mesh_link(facade, writer, options)
}
