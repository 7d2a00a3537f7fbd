//! Serializes a [`MeshAssociativity`] façade to a `MeshLink` XML document
//! (§4.9): attributes/attribute-groups, geometry files and groups, mesh
//! files (models/sheets/strings/faces/edges), transforms, linkages, in
//! that fixed order.

use crate::error::Result;
use crate::model::mesh_associativity::MeshAssociativity;
use crate::writer::mesh_writer::{write_edge, write_face, write_param_vertices};
use crate::writer::xml_writer::XmlWriter;
use crate::writer::WriterOptions;
use std::io::Write;

pub fn write_mesh_link<W: Write>(facade: &MeshAssociativity, writer: W, options: &WriterOptions) -> Result<()> {
    let (indent_char, indent_size) = options.indent;
    let mut xml = XmlWriter::new(writer, indent_char, indent_size);
    xml.write_declaration()?;
    xml.write_comment(" generated by meshlink-core ")?;

    xml.start_element("MeshLink")
        .attr("version", "1.0")
        .attr("xmlns", &options.xmlns)
        .attr("xmlns:xsi", &options.xmlns_xsi)
        .attr("xsi:schemaLocation", &options.schema_location)
        .write_start()?;

    write_attributes(&mut xml, facade)?;
    write_geometry(&mut xml, facade)?;
    write_mesh_files(&mut xml, facade, options)?;
    write_transforms(&mut xml, facade)?;
    write_linkages(&mut xml, facade)?;

    xml.end_element("MeshLink")?;
    tracing::info!(
        models = facade.models().len(),
        attributes = facade.attributes().len(),
        "wrote MeshLink document"
    );
    Ok(())
}

fn write_attributes<W: Write>(xml: &mut XmlWriter<W>, facade: &MeshAssociativity) -> Result<()> {
    let mut attrs: Vec<_> = facade.attributes().iter().collect();
    attrs.sort_by_key(|a| a.attid);
    for att in attrs {
        let tag = if att.is_group { "AttributeGroup" } else { "Attribute" };
        let mut builder = xml.start_element(tag).attr("attid", &att.attid.to_string());
        if let Some(name) = &att.name {
            builder = builder.attr("name", name);
        }
        builder.write_text(&att.contents)?;
    }
    Ok(())
}

fn write_geometry<W: Write>(xml: &mut XmlWriter<W>, facade: &MeshAssociativity) -> Result<()> {
    for file in facade.geometry().files() {
        let mut builder = xml.start_element("GeometryFile").attr("filename", &file.filename);
        if let Some(aref) = file.aref {
            builder = builder.attr("aref", &aref.to_string());
        }
        builder.write_start()?;
        for gid in &file.group_ids {
            if let Some(group) = facade.geometry().get_by_id(*gid) {
                let mut names: Vec<&String> = group.entity_names.iter().collect();
                names.sort();
                let entity = names.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" ");
                let mut child = xml.start_element("GeometryReference").attr("gid", &gid.to_string()).attr("ref", &entity);
                if let Some(name) = &group.name {
                    child = child.attr("name", name);
                }
                if let Some(aref) = group.aref {
                    child = child.attr("aref", &aref.to_string());
                }
                child.write_empty()?;
            }
        }
        xml.end_element("GeometryFile")?;
    }

    for gid in facade.geometry().ids() {
        let group = match facade.geometry().get_by_id(gid) {
            Some(g) => g,
            None => continue,
        };
        if !group.is_composite() {
            continue;
        }
        let mut builder = xml.start_element("GeometryGroup").attr("gid", &gid.to_string());
        if let Some(name) = &group.name {
            builder = builder.attr("name", name);
        }
        if let Some(aref) = group.aref {
            builder = builder.attr("aref", &aref.to_string());
        }
        let content = group.child_group_ids.iter().map(|g| g.to_string()).collect::<Vec<_>>().join(" ");
        builder.write_text(&content)?;
    }
    Ok(())
}

fn write_mesh_files<W: Write>(xml: &mut XmlWriter<W>, facade: &MeshAssociativity, options: &WriterOptions) -> Result<()> {
    for file in facade.mesh_files() {
        let mut builder = xml.start_element("MeshFile").attr("filename", &file.filename);
        if let Some(aref) = file.aref {
            builder = builder.attr("aref", &aref.to_string());
        }
        builder.write_start()?;
        for model_name in &file.model_refs {
            if let Some(model) = facade.model_by_name(model_name) {
                write_model(xml, model, options)?;
            }
        }
        xml.end_element("MeshFile")?;
    }
    Ok(())
}

fn write_model<W: Write>(xml: &mut XmlWriter<W>, model: &crate::model::mesh_model::MeshModel, options: &WriterOptions) -> Result<()> {
    xml.start_element("MeshModelReference").attr("ref", model.name()).write_start()?;

    write_param_vertices(xml, model.param_vertices())?;

    for point in model.points().iter_in_order() {
        let mut builder = xml.start_element("MeshPointReference");
        if point.common.mid.is_valid() {
            builder = builder.attr("mid", &point.common.mid.to_string());
        }
        if point.common.aref.is_valid() {
            builder = builder.attr("aref", &point.common.aref.to_string());
        }
        if point.common.gref.is_valid() {
            builder = builder.attr("gref", &point.common.gref.to_string());
        }
        builder = builder.attr("name", &point.common.name);
        let content = match &point.key {
            crate::model::element::PointKey::Ref(r) => r.clone(),
            crate::model::element::PointKey::Index(i) => i.to_string(),
        };
        builder.write_text(&content)?;
    }

    for sheet in model.sheets().iter_in_order() {
        let tag = if sheet.ref_id.is_some() { "MeshSheetReference" } else { "MeshSheet" };
        let mut builder = xml.start_element(tag).attr("name", sheet.name());
        if let Some(r) = &sheet.ref_id {
            builder = builder.attr("ref", r);
        }
        builder.write_start()?;
        write_param_vertices(xml, sheet.param_vertices())?;
        for face in sheet.faces().iter_in_order() {
            write_face(xml, face, options.compress)?;
        }
        xml.end_element(tag)?;
    }

    for string in model.strings().iter_in_order() {
        let tag = if string.ref_id.is_some() { "MeshStringReference" } else { "MeshString" };
        let mut builder = xml.start_element(tag).attr("name", string.name());
        if let Some(r) = &string.ref_id {
            builder = builder.attr("ref", r);
        }
        builder.write_start()?;
        write_param_vertices(xml, string.param_vertices())?;
        for edge in string.edges().iter_in_order() {
            write_edge(xml, edge, options.compress)?;
        }
        xml.end_element(tag)?;
    }

    xml.end_element("MeshModelReference")
}

fn write_transforms<W: Write>(xml: &mut XmlWriter<W>, facade: &MeshAssociativity) -> Result<()> {
    let mut transforms: Vec<_> = facade.transforms().iter().collect();
    transforms.sort_by_key(|t| t.xid);
    for t in transforms {
        let mut builder = xml.start_element("Transform").attr("xid", &t.xid.to_string());
        if let Some(name) = facade.transforms().name_of(t.xid) {
            builder = builder.attr("name", name);
        }
        if t.aref.is_valid() {
            builder = builder.attr("aref", &t.aref.to_string());
        }
        let content = t.matrix.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
        builder.write_text(&content)?;
    }
    Ok(())
}

fn write_linkages<W: Write>(xml: &mut XmlWriter<W>, facade: &MeshAssociativity) -> Result<()> {
    let mut linkages: Vec<_> = facade.linkages().iter().collect();
    linkages.sort_by(|a, b| a.name.cmp(&b.name));
    for l in linkages {
        let mut builder = xml
            .start_element("MeshElementLinkage")
            .attr("name", &l.name)
            .attr("sourceEntityRef", &l.source_ref)
            .attr("targetEntityRef", &l.target_ref);
        if l.aref.is_valid() {
            builder = builder.attr("aref", &l.aref.to_string());
        }
        if l.xref.is_valid() {
            builder = builder.attr("xref", &l.xref.to_string());
        }
        builder.write_empty()?;
    }
    Ok(())
}
