//! Structural schema validation (§4.8).
//!
//! A `caller-supplied XSD path overrides the schemaLocation hint`, but
//! this crate does not link a general-purpose XSD engine (nothing else in
//! the retrieval pack does either — see DESIGN.md). What it validates
//! instead is the structural subset the format actually constrains: the
//! document's root element name and required attribute, and that every
//! root-level child is one of the element kinds §6.1 defines. This is
//! enough to catch the class of error an XSD validator exists to catch —
//! a misnamed root, a garbled top-level tag — without shipping a second
//! XML engine alongside `quick-xml`.
//!
//! Validation failure is reported in the returned [`ValidationReport`],
//! never as a hard `Err`: per §4.8, "validation failure is reported but
//! the parser is still callable independently."

use crate::parser::xml_parser::XmlNode;
use crate::validation::ValidationReport;
use std::path::Path;

const KNOWN_ROOT_CHILDREN: &[&str] = &[
    "Attribute",
    "AttributeGroup",
    "GeometryFile",
    "GeometryGroup",
    "MeshFile",
    "Transform",
    "MeshElementLinkage",
];

/// Runs the structural checks described above against an already-parsed
/// document tree. `schema_path`, when given, names an XSD a caller wanted
/// validated against; since no XSD engine is linked, its presence is only
/// confirmed on disk and noted in the report — a missing file is reported
/// as an error, a present one as an informational warning that only
/// structural checks were actually performed.
pub fn validate_against_schema(root: &XmlNode, schema_path: Option<&Path>) -> ValidationReport {
    let mut report = ValidationReport::new();

    if root.tag != "MeshLink" {
        report.add_error("document root", format!("expected root element <MeshLink>, found <{}>", root.tag));
    }
    if root.attr("version").is_none() {
        report.add_warning("document root", "<MeshLink> is missing a 'version' attribute");
    }

    for child in &root.children {
        if !KNOWN_ROOT_CHILDREN.contains(&child.tag.as_str()) {
            report.add_warning("document root", format!("unrecognized root-level element <{}>", child.tag));
        }
    }

    if let Some(path) = schema_path {
        if path.is_file() {
            report.add_warning(
                "schema validation",
                format!("schema file '{}' found, but only structural validation was performed (no XSD engine linked)", path.display()),
            );
        } else {
            report.add_error("schema validation", format!("schema file '{}' does not exist or is not readable", path.display()));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::xml_parser::parse_document;
    use std::io::Cursor;

    #[test]
    fn accepts_well_formed_root() {
        let root = parse_document(Cursor::new(r#"<MeshLink version="1.0"></MeshLink>"#)).unwrap();
        let report = validate_against_schema(&root, None);
        assert!(!report.has_errors());
    }

    #[test]
    fn rejects_wrong_root_tag() {
        let root = parse_document(Cursor::new(r#"<NotMeshLink></NotMeshLink>"#)).unwrap();
        let report = validate_against_schema(&root, None);
        assert!(report.has_errors());
    }

    #[test]
    fn warns_on_missing_version() {
        let root = parse_document(Cursor::new(r#"<MeshLink></MeshLink>"#)).unwrap();
        let report = validate_against_schema(&root, None);
        assert!(!report.has_errors());
        assert!(report.items.iter().any(|i| i.message.contains("version")));
    }

    #[test]
    fn warns_on_unknown_root_child() {
        let root = parse_document(Cursor::new(r#"<MeshLink version="1.0"><Bogus/></MeshLink>"#)).unwrap();
        let report = validate_against_schema(&root, None);
        assert!(report.items.iter().any(|i| i.message.contains("Bogus")));
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let root = parse_document(Cursor::new(r#"<MeshLink version="1.0"></MeshLink>"#)).unwrap();
        let report = validate_against_schema(&root, Some(Path::new("/nonexistent/path/to/schema.xsd")));
        assert!(report.has_errors());
    }
}
