//! Writes the element blocks inside a `MeshSheet`/`MeshString`: `ParamVertex`
//! siblings, then the typed `MeshFace`/`MeshEdge` blocks (§4.9).

use crate::error::Result;
use crate::ids::Mid;
use crate::model::element::{EdgeKey, FaceKey, FaceShape, MeshEdge, MeshFace};
use crate::model::param_vertex::ParamVertexTable;
use crate::writer::xml_writer::{format_f64_15, XmlWriter};
use base64::Engine;
use std::io::Write;

fn opt_mid(mid: Mid) -> Option<String> {
    mid.is_valid().then(|| mid.to_string())
}

pub fn write_param_vertices<W: Write>(xml: &mut XmlWriter<W>, table: &ParamVertexTable) -> Result<()> {
    for (vref, pv) in table.iter() {
        let mut builder = xml
            .start_element("ParamVertex")
            .attr("vref", vref)
            .attr("gref", &pv.gref.to_string())
            .attr("dim", if pv.dim == 2 { "2" } else { "1" });
        if let Some(mid) = opt_mid(pv.mid) {
            builder = builder.attr("mid", &mid);
        }
        let content = if pv.dim == 2 {
            format!("{} {}", format_f64_15(pv.u), format_f64_15(pv.v))
        } else {
            format_f64_15(pv.u)
        };
        builder.write_text(&content)?;
    }
    Ok(())
}

/// Writes one `MeshFace`/`MeshFaceReference` child, `compress` controlling
/// whether an index-form face is emitted as a base64 little-endian i32
/// block. Reference-form faces still declare their real `etype`
/// (`Tri3`/`Quad4`, carried alongside the reference string since it has no
/// indices to derive it from) but open a `<MeshFaceReference>` tag instead
/// of `<MeshFace>` — the tag name is the form discriminator, per §6.1, not
/// `etype`.
pub fn write_face<W: Write>(xml: &mut XmlWriter<W>, face: &MeshFace, compress: bool) -> Result<()> {
    let (tag, etype, body, indices_content, is_ref) = match &face.key {
        FaceKey::Index(i1, i2, i3, i4) => {
            let (etype, idx): (&str, Vec<i32>) = match face.key.shape() {
                Some(FaceShape::Tri3) => ("Tri3", vec![*i1 as i32, *i2 as i32, *i3 as i32]),
                Some(FaceShape::Quad4) | None => {
                    ("Quad4", vec![*i1 as i32, *i2 as i32, *i3 as i32, i4.unwrap_or(0) as i32])
                }
            };
            ("MeshFace", etype, String::new(), idx, false)
        }
        FaceKey::Ref(r) => {
            let etype = match face.ref_shape {
                Some(FaceShape::Quad4) => "Quad4",
                _ => "Tri3",
            };
            ("MeshFaceReference", etype, r.clone(), Vec::new(), true)
        }
    };

    let mut builder = xml.start_element(tag).attr("etype", etype);
    if let Some(mid) = opt_mid(face.common.mid) {
        builder = builder.attr("mid", &mid);
    }
    if face.common.aref.is_valid() {
        builder = builder.attr("aref", &face.common.aref.to_string());
    }
    if face.common.gref.is_valid() {
        builder = builder.attr("gref", &face.common.gref.to_string());
    }
    builder = builder.attr("name", &face.common.name);

    if is_ref {
        builder.write_text(&body)?;
    } else if compress {
        let mut bytes = Vec::with_capacity(indices_content.len() * 4);
        for v in &indices_content {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        builder = builder.attr("format", "base64");
        builder.write_text(&base64::engine::general_purpose::STANDARD.encode(bytes))?;
    } else {
        let text = indices_content.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");
        builder.write_text(&text)?;
    }
    Ok(())
}

/// Writes one `MeshEdge`/`MeshEdgeReference` child. Reference-form edges
/// still declare `etype="Edge2"` but open a `<MeshEdgeReference>` tag, the
/// same tag-is-the-discriminator rule as [`write_face`].
pub fn write_edge<W: Write>(xml: &mut XmlWriter<W>, edge: &MeshEdge, compress: bool) -> Result<()> {
    let tag = match &edge.key {
        EdgeKey::Index(..) => "MeshEdge",
        EdgeKey::Ref(_) => "MeshEdgeReference",
    };
    let mut builder = xml.start_element(tag).attr("etype", "Edge2");
    if let Some(mid) = opt_mid(edge.common.mid) {
        builder = builder.attr("mid", &mid);
    }
    if edge.common.aref.is_valid() {
        builder = builder.attr("aref", &edge.common.aref.to_string());
    }
    if edge.common.gref.is_valid() {
        builder = builder.attr("gref", &edge.common.gref.to_string());
    }
    builder = builder.attr("name", &edge.common.name);

    match &edge.key {
        EdgeKey::Ref(r) => builder.write_text(r)?,
        EdgeKey::Index(i1, i2) => {
            if compress {
                let mut bytes = Vec::with_capacity(8);
                bytes.extend_from_slice(&(*i1 as i32).to_le_bytes());
                bytes.extend_from_slice(&(*i2 as i32).to_le_bytes());
                builder = builder.attr("format", "base64");
                builder.write_text(&base64::engine::general_purpose::STANDARD.encode(bytes))?;
            } else {
                builder.write_text(&format!("{i1} {i2}"))?;
            }
        }
    }
    Ok(())
}
