//! # meshlink-core
//!
//! Associativity graph linking a discrete mesh to the CAD geometry it
//! discretizes, with a schema-validating XML reader/writer.
//!
//! ## Overview
//!
//! MeshLink is a data-interchange layer binding a discrete mesh (points,
//! edges, faces organized into strings, sheets, and models) to the
//! continuous CAD geometry that mesh discretizes. Given a `MeshLink` XML
//! document, this crate loads a typed associativity graph that lets an
//! analysis or refinement tool:
//!
//! - locate the mesh point/edge/face that carries a given index or
//!   reference, at a chosen topological level (lowest/highest),
//! - recover the geometry group (and its constituent surface/curve
//!   entities) associated with any mesh topology element,
//! - evaluate or project points on those geometric entities through a
//!   pluggable, caller-supplied geometry kernel,
//! - round-trip the enriched graph back to an equivalent XML document.
//!
//! The hard engineering is the associativity graph itself and its XML
//! parser/writer, not the geometry kernel (which this crate only calls
//! through a trait, see [`kernel`]) or any command-line front end (see the
//! separate `meshlink-cli` crate).
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshlink_core::parser::{parse_mesh_link, ParserOptions};
//! use meshlink_core::writer::{write_mesh_link, WriterOptions};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("model.xml")?;
//! let (facade, report) = parse_mesh_link(BufReader::new(file), &ParserOptions::default())?;
//! if report.has_errors() {
//!     for diag in &report.diagnostics {
//!         eprintln!("{}: {}", diag.context, diag.message);
//!     }
//! }
//!
//! for model in facade.models_in_order() {
//!     println!("{}: {} sheets, {} strings", model.name(), model.sheets().len(), model.strings().len());
//! }
//!
//! let options = WriterOptions::from_doc_meta(&facade.xml_meta);
//! write_mesh_link(&facade, std::io::stdout(), &options)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ids`]: typed identifiers (`AttId`, `Gid`, `Xid`, `Mid`) and the
//!   unordered-index FNV-1 hashing scheme.
//! - [`model`]: the in-memory associativity graph — attribute store,
//!   geometry-binding store, ParamVertex tables, mesh topology containers,
//!   and the [`model::MeshAssociativity`] façade that owns all of it.
//! - [`name_gen`]: per-façade, per-element-kind deterministic name
//!   generation.
//! - [`kernel`]: the geometry-kernel contract the core calls but does not
//!   implement, plus a per-façade kernel registry.
//! - [`parser`]: the XML-to-`MeshAssociativity` pipeline.
//! - [`writer`]: the `MeshAssociativity`-to-XML pipeline.
//! - [`validation`]: structural/schema validation and the semantic
//!   invariant checks a caller can run over a loaded façade.
//! - [`report`]: the `ParseReport`/`ParseDiagnostic` carrier for
//!   recoverable per-node parse failures.
//! - [`error`]: the crate's error type, [`error::MeshLinkError`].
//!
//! ## Design Principles
//!
//! - **No panics**: every fallible operation returns
//!   `Result<T, MeshLinkError>`. Malformed input never panics; only a
//!   caller-side logic bug would.
//! - **Deterministic iteration**: every container enumerates its elements
//!   in creation order, never hash or name order, so a second run over
//!   the same input produces byte-identical output.
//! - **Per-façade state**: name counters and the active geometry kernel
//!   are owned by each `MeshAssociativity` instance rather than shared
//!   process-wide, so multiple façades can be built concurrently on
//!   separate threads.
//! - **Collect-and-continue parsing**: a malformed mesh element is
//!   reported and skipped; only a malformed root document or I/O failure
//!   aborts the whole parse.

pub mod error;
pub mod ids;
pub mod kernel;
pub mod model;
pub mod name_gen;
pub mod parser;
pub mod report;
pub mod validation;
pub mod writer;

pub use error::{MeshLinkError, Result};
pub use model::MeshAssociativity;

#[cfg(test)]
mod tests {
    use crate::parser::{parse_mesh_link, ParserOptions};
    use crate::writer::{write_mesh_link, WriterOptions};
    use std::io::Cursor;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<MeshLink version="1.0">
  <Attribute attid="1" name="model size">1.0</Attribute>
  <GeometryFile filename="geom.xyz">
    <GeometryReference gid="1" ref="face_1"/>
  </GeometryFile>
  <MeshFile filename="mesh.xyz">
    <MeshModelReference ref="/Base/m0" name="/Base/m0">
      <MeshSheet name="sh0" gref="1">
        <MeshFace etype="Tri3" mid="1" name="f0">1 2 3</MeshFace>
      </MeshSheet>
    </MeshModelReference>
  </MeshFile>
</MeshLink>"#;

    #[test]
    fn parse_then_write_round_trips_element_counts() {
        let (facade, report) = parse_mesh_link(Cursor::new(SAMPLE), &ParserOptions::default()).unwrap();
        assert!(!report.has_errors());
        assert_eq!(facade.models().len(), 1);

        let options = WriterOptions::from_doc_meta(&facade.xml_meta);
        let mut buf = Vec::new();
        write_mesh_link(&facade, &mut buf, &options).unwrap();

        let (facade2, report2) = parse_mesh_link(Cursor::new(buf), &ParserOptions::default()).unwrap();
        assert!(!report2.has_errors());
        assert_eq!(facade2.models().len(), facade.models().len());
        let m0 = facade2.model_by_name("/Base/m0").unwrap();
        assert_eq!(m0.sheets().len(), 1);
        assert_eq!(m0.sheet_by_name("sh0").unwrap().faces().len(), 1);
    }
}
