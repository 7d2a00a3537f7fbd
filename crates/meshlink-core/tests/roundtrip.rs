//! Integration tests driving the parser, validation passes, and writer
//! together against a fixture file, rather than through any single
//! module's unit tests.

use meshlink_core::parser::{parse_mesh_link, ParserOptions};
use meshlink_core::validation::validate_semantic;
use meshlink_core::writer::{write_mesh_link, WriterOptions};
use std::fs::File;
use std::io::{BufReader, Cursor};

fn fixture_path() -> std::path::PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", "sphere_ml.xml"].iter().collect()
}

fn open_fixture() -> (meshlink_core::model::MeshAssociativity, meshlink_core::report::ParseReport) {
    let file = File::open(fixture_path()).expect("fixture file should exist");
    parse_mesh_link(BufReader::new(file), &ParserOptions::default()).expect("fixture should parse cleanly")
}

#[test]
fn fixture_parses_without_diagnostics() {
    let (facade, report) = open_fixture();
    assert!(!report.has_errors(), "unexpected parse diagnostics: {:?}", report.diagnostics);

    assert_eq!(facade.models().len(), 1);
    let model = facade.model_by_name("/Base/sphere").expect("model should be present");
    assert_eq!(model.sheets().len(), 1);
    assert_eq!(model.strings().len(), 1);

    let sheet = model.sheet_by_name("sh_octant").expect("sheet should be present");
    assert_eq!(sheet.faces().len(), 4);

    let string = model.string_by_name("str_boundary").expect("string should be present");
    assert_eq!(string.edges().len(), 2);
}

#[test]
fn fixture_has_no_semantic_findings() {
    let (facade, _report) = open_fixture();
    let findings = validate_semantic(&facade);
    assert!(!findings.has_errors(), "unexpected semantic findings: {:?}", findings.items);
}

#[test]
fn attribute_and_geometry_group_stores_are_populated() {
    let (facade, _report) = open_fixture();
    assert_eq!(facade.attributes().len(), 2);
    assert_eq!(facade.geometry().count(), 3);
    assert_eq!(facade.transforms().len(), 1);
    assert_eq!(facade.linkages().len(), 1);

    let composite = facade.geometry().get_by_name("octant_all").expect("composite group should be present");
    let entities = facade.geometry().entities(composite.gid);
    assert!(entities.contains("face_1"));
    assert!(entities.contains("edge_1"));
    assert!(entities.contains("edge_2"));
}

#[test]
fn lowest_topology_lookups_find_shared_points() {
    let (facade, _report) = open_fixture();
    let model = facade.model_by_name("/Base/sphere").unwrap();

    let point = model.find_lowest_topo_point_by_ind(1).expect("index 1 should be found");
    assert!(point.indices().is_some());

    let edge = model.find_lowest_topo_edge_by_inds(1, 2).expect("edge (1,2) should be found");
    assert_eq!(edge.common.name, "e0");

    let face = model.find_face_by_inds(1, 2, 5, meshlink_core::ids::INDEX_UNUSED).expect("face (1,2,5) should be found");
    assert_eq!(face.common.name, "f0");
}

#[test]
fn writer_round_trip_preserves_element_counts() {
    let (facade, report) = open_fixture();
    assert!(!report.has_errors());

    let options = WriterOptions::from_doc_meta(&facade.xml_meta);
    let mut buf = Vec::new();
    write_mesh_link(&facade, &mut buf, &options).expect("write should succeed");

    let (facade2, report2) = parse_mesh_link(Cursor::new(buf), &ParserOptions::default()).expect("re-parse should succeed");
    assert!(!report2.has_errors(), "unexpected diagnostics on re-parse: {:?}", report2.diagnostics);

    let model = facade.model_by_name("/Base/sphere").unwrap();
    let model2 = facade2.model_by_name("/Base/sphere").unwrap();
    assert_eq!(model.sheets().len(), model2.sheets().len());
    assert_eq!(model.strings().len(), model2.strings().len());
    assert_eq!(
        model.sheet_by_name("sh_octant").unwrap().faces().len(),
        model2.sheet_by_name("sh_octant").unwrap().faces().len()
    );
    assert_eq!(facade.attributes().len(), facade2.attributes().len());
    assert_eq!(facade.geometry().count(), facade2.geometry().count());
    assert_eq!(facade.transforms().len(), facade2.transforms().len());
    assert_eq!(facade.linkages().len(), facade2.linkages().len());
}

#[test]
fn reference_form_faces_and_edges_round_trip_through_the_writer() {
    use meshlink_core::ids::{AttId, Gid, Mid};
    use meshlink_core::model::element::FaceShape;
    use meshlink_core::model::{MeshAssociativity, MeshFileRecord, MeshModel, MeshSheet, MeshString};

    let mut facade = MeshAssociativity::new();
    let mut model = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "m0", 0);
    model.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
    model.add_string(MeshString::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "str0", 0)).unwrap();
    model
        .add_sheet_face_by_ref("sh0", "f0", "kernel_face_7", FaceShape::Quad4, Mid::INVALID, AttId::INVALID, Gid::INVALID)
        .unwrap();
    model
        .add_string_edge_by_ref("str0", "e0", "kernel_edge_3", Mid::INVALID, AttId::INVALID, Gid::INVALID)
        .unwrap();
    facade.add_model(model).unwrap();
    facade.add_mesh_file(MeshFileRecord { filename: "a.cas".into(), aref: None, model_refs: vec!["m0".into()] });

    let options = WriterOptions::default();
    let mut buf = Vec::new();
    write_mesh_link(&facade, &mut buf, &options).expect("write should succeed");
    let xml = String::from_utf8(buf.clone()).unwrap();
    assert!(xml.contains("MeshFaceReference"), "{xml}");
    assert!(xml.contains("MeshEdgeReference"), "{xml}");
    assert!(xml.contains(r#"etype="Quad4""#), "{xml}");

    let (facade2, report2) = parse_mesh_link(Cursor::new(buf), &ParserOptions::default()).expect("re-parse should succeed");
    assert!(!report2.has_errors(), "unexpected diagnostics on re-parse: {:?}", report2.diagnostics);
    let model2 = facade2.model_by_name("m0").unwrap();
    let face2 = model2.sheet_by_name("sh0").unwrap().faces().get_by_ref("kernel_face_7").unwrap();
    assert_eq!(face2.shape(), Some(FaceShape::Quad4));
    assert!(model2.string_by_name("str0").unwrap().find_edge_by_ref("kernel_edge_3").is_some());
}

#[test]
fn mesh_sheet_and_string_reference_forms_keep_name_and_ref_independent() {
    let doc = r#"<MeshLink version="1.0">
        <MeshFile filename="a.cas">
            <MeshModelReference ref="m0">
                <MeshSheetReference name="sh0" ref="kernel_sheet_1">
                    <MeshFace etype="Tri3" mid="1" name="f0">1 2 3</MeshFace>
                </MeshSheetReference>
                <MeshStringReference name="str0" ref="kernel_string_1">
                    <MeshEdge etype="Edge2" mid="2" name="e0">1 2</MeshEdge>
                </MeshStringReference>
            </MeshModelReference>
        </MeshFile>
    </MeshLink>"#;

    let (facade, report) = parse_mesh_link(Cursor::new(doc), &ParserOptions::default()).expect("parse should succeed");
    assert!(!report.has_errors(), "unexpected diagnostics: {:?}", report.diagnostics);

    let model = facade.model_by_name("m0").unwrap();
    let sheet = model.sheet_by_name("sh0").expect("sheet should be addressable by its own name");
    assert_eq!(sheet.ref_id.as_deref(), Some("kernel_sheet_1"));
    assert!(model.sheet_by_ref("kernel_sheet_1").is_some(), "sheet should also be addressable by ref");

    let string = model.string_by_name("str0").expect("string should be addressable by its own name");
    assert_eq!(string.ref_id.as_deref(), Some("kernel_string_1"));
    assert!(model.string_by_ref("kernel_string_1").is_some(), "string should also be addressable by ref");

    let options = WriterOptions::default();
    let mut buf = Vec::new();
    write_mesh_link(&facade, &mut buf, &options).expect("write should succeed");
    let xml = String::from_utf8(buf.clone()).unwrap();
    assert!(xml.contains("<MeshSheetReference"), "{xml}");
    assert!(xml.contains("<MeshStringReference"), "{xml}");
    assert!(xml.contains(r#"ref="kernel_sheet_1""#), "{xml}");
    assert!(xml.contains(r#"ref="kernel_string_1""#), "{xml}");

    let (facade2, report2) = parse_mesh_link(Cursor::new(buf), &ParserOptions::default()).expect("re-parse should succeed");
    assert!(!report2.has_errors(), "unexpected diagnostics on re-parse: {:?}", report2.diagnostics);
    let model2 = facade2.model_by_name("m0").unwrap();
    assert_eq!(model2.sheet_by_name("sh0").unwrap().ref_id.as_deref(), Some("kernel_sheet_1"));
    assert_eq!(model2.string_by_name("str0").unwrap().ref_id.as_deref(), Some("kernel_string_1"));
}

#[test]
fn writer_preserves_document_namespace_metadata() {
    let (facade, _report) = open_fixture();
    assert_eq!(facade.xml_meta.xmlns.as_deref(), Some("http://www.numeca.be/MeshLink"));
    assert_eq!(facade.xml_meta.xmlns_xsi.as_deref(), Some("http://www.w3.org/2001/XMLSchema-instance"));
    assert!(facade.xml_meta.schema_location.as_deref().unwrap().contains("MeshLink.xsd"));
}
