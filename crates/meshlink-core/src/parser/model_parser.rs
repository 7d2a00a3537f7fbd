//! Top-level `MeshLink` document parser (§4.8): visits the document tree
//! in the fixed 7-pass order the format requires, independent of the
//! elements' physical order on disk, building a [`MeshAssociativity`]
//! façade and a parallel [`ParseReport`] of per-node diagnostics.
//!
//! Pass order: root attributes, root attribute-groups, geometry files
//! (and their leaf `GeometryReference` children), root geometry groups
//! (composites), mesh files (models/sheets/strings/faces/edges), root
//! transforms, root mesh-element linkages.

use crate::error::{MeshLinkError, Result};
use crate::ids::{AttId, Gid, Mid, Xid};
use crate::model::attribute::Attribute;
use crate::model::geometry::{GeometryFile, GeometryGroup};
use crate::model::linkage::{MeshElementLinkage, MeshLinkTransform};
use crate::model::mesh_associativity::{MeshAssociativity, MeshFileRecord, XmlDocMeta};
use crate::model::mesh_model::MeshModel;
use crate::model::mesh_sheet::MeshSheet;
use crate::model::mesh_string::MeshString;
use crate::name_gen::ElementKind;
use crate::parser::mesh_parser;
use crate::parser::xml_parser::{parse_document, XmlNode};
use crate::parser::ParserOptions;
use crate::report::ParseReport;
use std::collections::HashSet;
use std::io::BufRead;

/// Parses a complete `MeshLink` document from `reader`, returning the
/// populated façade alongside a diagnostic report. Per-node failures are
/// recorded in the report and that node is skipped; only a malformed XML
/// document or a missing document root is a hard error.
pub fn parse_mesh_link<R: BufRead>(reader: R, options: &ParserOptions) -> Result<(MeshAssociativity, ParseReport)> {
    let root = parse_document(reader)?;
    if root.tag != "MeshLink" {
        return Err(MeshLinkError::ParseError(format!("document root is '<{}>', expected '<MeshLink>'", root.tag)));
    }

    let mut facade = MeshAssociativity::new();
    let mut report = ParseReport::new();

    if options.validate || options.schema_path.is_some() {
        let schema_report = crate::validation::validate_against_schema(&root, options.schema_path.as_deref());
        report.extend_from_validation(schema_report);
    }

    facade.xml_meta = XmlDocMeta {
        xmlns: root.attr("xmlns").map(str::to_string),
        xmlns_xsi: root.attr("xmlns:xsi").map(str::to_string),
        schema_location: root.attr("xsi:schemaLocation").map(str::to_string),
    };

    parse_attributes(&root, &mut facade, &mut report, false);
    parse_attributes(&root, &mut facade, &mut report, true);
    parse_geometry_files(&root, &mut facade, &mut report);
    parse_geometry_groups(&root, &mut facade, &mut report);
    parse_mesh_files(&root, &mut facade, &mut report);
    parse_transforms(&root, &mut facade, &mut report);
    parse_linkages(&root, &mut facade, &mut report);

    tracing::info!(
        models = facade.models().len(),
        errors = report.has_errors(),
        "parsed MeshLink document"
    );
    Ok((facade, report))
}

fn parse_attributes(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport, groups: bool) {
    let tag = if groups { "AttributeGroup" } else { "Attribute" };
    for node in root.children_named(tag) {
        let result: Result<()> = (|| {
            let attid = AttId(node.require_attr_i64("attid")?);
            let name = node.attr("name").map(str::to_string);
            let att = if groups {
                Attribute::group(attid, name, node.text.trim())
            } else {
                Attribute::scalar(attid, name, node.text.trim())
            };
            facade.attributes_mut().add(att)
        })();
        if let Err(err) = result {
            report.record_error(format!("<{tag}>"), &err);
        }
    }
}

/// `GeometryFile` elements and their leaf `GeometryReference` children
/// (pass 3).
fn parse_geometry_files(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) {
    for node in root.children_named("GeometryFile") {
        let filename = match node.require_attr("filename") {
            Ok(f) => f.to_string(),
            Err(err) => {
                report.record_error("<GeometryFile>", &err);
                continue;
            }
        };
        let aref = match node.attr_i64("aref") {
            Ok(v) => v.map(AttId),
            Err(err) => {
                report.record_error(format!("<GeometryFile filename='{filename}'>"), &err);
                continue;
            }
        };
        let mut group_ids = Vec::new();
        for child in node.children_named("GeometryReference") {
            match parse_geometry_reference(child, facade) {
                Ok(gid) => group_ids.push(gid),
                Err(err) => report.record_error(format!("<GeometryReference> in file '{filename}'"), &err),
            }
        }
        facade.geometry_mut().add_file(GeometryFile { filename, aref, group_ids });
    }
}

fn parse_geometry_reference(node: &XmlNode, facade: &mut MeshAssociativity) -> Result<Gid> {
    let gid = Gid(node.require_attr_i64("gid")?);
    let name = node.attr("name").map(str::to_string);
    let aref = node.attr_i64("aref")?.map(AttId);
    let entity: HashSet<String> = node.require_attr("ref")?.split_whitespace().map(str::to_string).collect();
    let group = GeometryGroup::leaf(gid, name, aref, entity);
    facade.geometry_mut().add_group(group)?;
    Ok(gid)
}

/// Root-level `GeometryGroup` elements: composites over the leaf groups
/// parsed in pass 3 (pass 4).
fn parse_geometry_groups(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) {
    for node in root.children_named("GeometryGroup") {
        let result: Result<()> = (|| {
            let gid = Gid(node.require_attr_i64("gid")?);
            let name = node.attr("name").map(str::to_string);
            let aref = node.attr_i64("aref")?.map(AttId);
            let children = node
                .text
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<i64>()
                        .map(Gid)
                        .map_err(|_| MeshLinkError::ParseError(format!("invalid gid token '{tok}' in GeometryGroup")))
                })
                .collect::<Result<Vec<_>>>()?;
            facade.geometry_mut().add_composite_group(GeometryGroup::composite(gid, name, aref, children))
        })();
        if let Err(err) = result {
            report.record_error("<GeometryGroup>", &err);
        }
    }
}

/// `MeshFile` elements, each containing one or more `MeshModelReference`
/// children (pass 5).
fn parse_mesh_files(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) {
    for node in root.children_named("MeshFile") {
        let filename = match node.require_attr("filename") {
            Ok(f) => f.to_string(),
            Err(err) => {
                report.record_error("<MeshFile>", &err);
                continue;
            }
        };
        let aref = match node.attr_i64("aref") {
            Ok(v) => v.map(AttId),
            Err(err) => {
                report.record_error(format!("<MeshFile filename='{filename}'>"), &err);
                continue;
            }
        };
        let mut model_refs = Vec::new();
        for child in node.children_named("MeshModelReference") {
            match parse_mesh_model(child, facade, report) {
                Ok(name) => model_refs.push(name),
                Err(err) => report.record_error(format!("<MeshModelReference> in file '{filename}'"), &err),
            }
        }
        facade.add_mesh_file(MeshFileRecord { filename, aref, model_refs });
    }
}

fn parse_mesh_model(node: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) -> Result<String> {
    let name = node.require_attr("ref")?.to_string();
    let mid = node.attr_i64("mid")?.map(Mid).unwrap_or(Mid::INVALID);
    let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
    let gref = node.attr_i64("gref")?.map(Gid).unwrap_or(Gid::INVALID);
    let mut model = MeshModel::new(mid, aref, gref, name.clone(), 0);

    mesh_parser::parse_param_vertices_into_model(node, &mut model, report);

    for sheet_node in node.children.iter().filter(|c| c.tag == "MeshSheet" || c.tag == "MeshSheetReference") {
        if let Err(err) = parse_mesh_sheet(sheet_node, &mut model, facade.name_gen_mut(), gref, report) {
            report.record_error(format!("<MeshSheet> in model '{name}'"), &err);
        }
    }

    for string_node in node.children.iter().filter(|c| c.tag == "MeshString" || c.tag == "MeshStringReference") {
        if let Err(err) = parse_mesh_string(string_node, &mut model, facade.name_gen_mut(), gref, report) {
            report.record_error(format!("<MeshString> in model '{name}'"), &err);
        }
    }

    for point_node in node.children_named("MeshPointReference") {
        if let Err(err) = parse_mesh_point_reference(point_node, &mut model, facade.name_gen_mut(), gref) {
            report.record_error(format!("<MeshPointReference> in model '{name}'"), &err);
        }
    }

    facade.add_model(model)?;
    Ok(name)
}

/// `name` and `ref` are independent attributes (the original tracks them in
/// separate `getMeshSheetByName`/`getMeshSheetByRef` lookup tables, not one
/// conflated identity): `name` is the element's own name, auto-generated
/// when absent exactly like any other element; `ref`, present only on the
/// `<MeshSheetReference>` tag form, is the caller-facing identity the
/// element cross-references under, mirroring the `MeshFace`/`MeshFaceReference`
/// and `MeshEdge`/`MeshEdgeReference` split. The tag parsed is what the
/// writer consults to emit `<MeshSheet>` or `<MeshSheetReference>` back.
fn parse_mesh_sheet(
    node: &XmlNode,
    model: &mut MeshModel,
    name_gen: &mut crate::name_gen::NameGenerator,
    inherited_gref: Gid,
    report: &mut ParseReport,
) -> Result<()> {
    let name = node
        .attr("name")
        .map(str::to_string)
        .unwrap_or_else(|| name_gen.next_name(ElementKind::Sheet));
    let mid = node.attr_i64("mid")?.map(Mid).unwrap_or(Mid::INVALID);
    let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
    let gref = node.attr_i64("gref")?.map(Gid).unwrap_or(inherited_gref);
    let mut sheet = MeshSheet::new(mid, aref, gref, name.clone(), 0);
    if node.tag == "MeshSheetReference" {
        sheet = sheet.with_ref(node.require_attr("ref")?.to_string());
    }
    model.add_sheet(sheet)?;

    mesh_parser::parse_param_vertices_into_sheet(node, model, &name, report);
    mesh_parser::parse_faces_into_sheet(node, model, &name, gref, name_gen, report);
    Ok(())
}

/// As [`parse_mesh_sheet`], for `MeshString`/`MeshStringReference`.
fn parse_mesh_string(
    node: &XmlNode,
    model: &mut MeshModel,
    name_gen: &mut crate::name_gen::NameGenerator,
    inherited_gref: Gid,
    report: &mut ParseReport,
) -> Result<()> {
    let name = node
        .attr("name")
        .map(str::to_string)
        .unwrap_or_else(|| name_gen.next_name(ElementKind::String));
    let mid = node.attr_i64("mid")?.map(Mid).unwrap_or(Mid::INVALID);
    let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
    let gref = node.attr_i64("gref")?.map(Gid).unwrap_or(inherited_gref);
    let mut string = MeshString::new(mid, aref, gref, name.clone(), 0);
    if node.tag == "MeshStringReference" {
        string = string.with_ref(node.require_attr("ref")?.to_string());
    }
    model.add_string(string)?;

    mesh_parser::parse_param_vertices_into_string(node, model, &name, report);
    mesh_parser::parse_edges_into_string(node, model, &name, gref, name_gen, report);
    Ok(())
}

fn parse_mesh_point_reference(
    node: &XmlNode,
    model: &mut MeshModel,
    name_gen: &mut crate::name_gen::NameGenerator,
    inherited_gref: Gid,
) -> Result<()> {
    let mid = node.attr_i64("mid")?.map(Mid).unwrap_or(Mid::INVALID);
    let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
    let gref = node.attr_i64("gref")?.map(Gid).unwrap_or(inherited_gref);
    let count = node.attr_i64("count")?.unwrap_or(1);
    let name = node.attr("name");
    if name.is_some() && count > 1 {
        return Err(MeshLinkError::ParseError("<MeshPointReference> cannot declare 'name' when count > 1".into()));
    }

    for tok in node.text.split_whitespace() {
        let elem_name = if count == 1 {
            name.map(str::to_string).unwrap_or_else(|| name_gen.next_name(ElementKind::Point))
        } else {
            name_gen.next_name(ElementKind::Point)
        };
        if let Ok(index) = tok.parse::<i64>() {
            model.add_point_by_index(elem_name, index, mid, aref, gref)?;
        } else {
            model.add_point_by_ref(elem_name, tok, mid, aref, gref)?;
        }
    }
    Ok(())
}

/// Root-level `Transform` elements (pass 6).
fn parse_transforms(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) {
    for node in root.children_named("Transform") {
        let result: Result<()> = (|| {
            let xid = Xid(node.require_attr_i64("xid")?);
            let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
            let name = node
                .attr("name")
                .map(str::to_string)
                .unwrap_or_else(|| facade.name_gen_mut().next_name(ElementKind::Transform));
            let values = node
                .text
                .split_whitespace()
                .map(|tok| {
                    lexical_core::parse::<f64>(tok.as_bytes())
                        .map_err(|_| MeshLinkError::ParseError(format!("Transform xid {xid} has non-numeric content")))
                })
                .collect::<Result<Vec<_>>>()?;
            let transform = MeshLinkTransform::new(xid, aref, &values)?;
            facade.add_transform(transform, name)
        })();
        if let Err(err) = result {
            report.record_error("<Transform>", &err);
        }
    }
}

/// Root-level `MeshElementLinkage` elements (pass 7).
fn parse_linkages(root: &XmlNode, facade: &mut MeshAssociativity, report: &mut ParseReport) {
    for node in root.children_named("MeshElementLinkage") {
        let result: Result<()> = (|| {
            let name = node
                .attr("name")
                .map(str::to_string)
                .unwrap_or_else(|| facade.name_gen_mut().next_name(ElementKind::Linkage));
            let source_ref = node.require_attr("sourceEntityRef")?.to_string();
            let target_ref = node.require_attr("targetEntityRef")?.to_string();
            let aref = node.attr_i64("aref")?.map(AttId).unwrap_or(AttId::INVALID);
            let xref = node.attr_i64("xref")?.map(Xid).unwrap_or(Xid::INVALID);
            facade.add_linkage(MeshElementLinkage::new(name, source_ref, target_ref, aref, xref))
        })();
        if let Err(err) = result {
            report.record_error("<MeshElementLinkage>", &err);
        }
    }
}
