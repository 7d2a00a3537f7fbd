//! `MeshSheet`: an ordered container of `MeshFace`s sharing a surface.
//!
//! A sheet owns its faces and, as a cascade of adding a face, the
//! face-bounding edges (`faceEdgeMap_` in the original, sheet-owned rather
//! than borrowed — see `MeshSheet.h`). Adding a face by index always
//! ensures its bounding edges exist in the sheet's own edge table,
//! exists-ok on edges that already do.

use crate::error::Result;
use crate::ids::{hash_edge, AttId, Gid, IndexTag, Mid};
use crate::model::element::{FaceShape, MeshEdge, MeshFace, TopoCommon};
use crate::model::element_table::{ElementTable, InsertOutcome, TopoElement};
use crate::model::param_vertex::{ParamVertex, ParamVertexTable};
use crate::name_gen::{ElementKind, NameGenerator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSheet {
    pub common: TopoCommon,
    /// The `ref` attribute, tracked independently of `common.name` (the
    /// original keeps separate `getMeshSheetByName`/`getMeshSheetByRef`
    /// lookup tables rather than one identity). `Some` exactly when this
    /// sheet was parsed from a `<MeshSheetReference>` element, which is
    /// also what the writer consults to pick the tag back on write.
    pub ref_id: Option<String>,
    faces: ElementTable<MeshFace>,
    face_edges: ElementTable<MeshEdge>,
    param_vertices: ParamVertexTable,
}

impl MeshSheet {
    pub fn new(mid: Mid, aref: AttId, gref: Gid, name: impl Into<String>, order: u64) -> Self {
        MeshSheet {
            common: TopoCommon::new(mid, aref, gref, name.into(), order),
            ref_id: None,
            faces: ElementTable::new(),
            face_edges: ElementTable::new(),
            param_vertices: ParamVertexTable::new(),
        }
    }

    /// As [`Self::new`], additionally recording the `ref` attribute a
    /// `<MeshSheetReference>` element declared.
    pub fn with_ref(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    /// Looks up the ParamVertex registered for point index `i` in this
    /// sheet's table, keyed by the integer-to-string conversion of the
    /// index (the lookup rule §4.8 specifies for index-form elements).
    fn pv_for_index(&self, i: i64) -> Option<ParamVertex> {
        self.param_vertices.get_by_vref(&i.to_string()).copied()
    }

    /// Adds a triangular face by index, cascading its three bounding edges
    /// into this sheet's face-edge table. `name_gen` supplies a name for
    /// any bounding edge that doesn't already exist. Each vertex's
    /// ParamVertex, if registered in this sheet's table, is attached to
    /// the face and propagated into the corresponding cascaded edges.
    pub fn add_tri_by_index(
        &mut self,
        name: impl Into<String>,
        indices: (i64, i64, i64),
        mid: Mid,
        aref: AttId,
        gref: Gid,
        name_gen: &mut NameGenerator,
    ) -> Result<(String, InsertOutcome)> {
        let pv = [
            self.pv_for_index(indices.0),
            self.pv_for_index(indices.1),
            self.pv_for_index(indices.2),
        ];
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        let face = MeshFace::tri_by_index(common, indices.0, indices.1, indices.2, pv);
        self.add_face(face, name_gen)
    }

    /// Adds a quadrilateral face by index, cascading its four bounding
    /// edges.
    pub fn add_quad_by_index(
        &mut self,
        name: impl Into<String>,
        indices: (i64, i64, i64, i64),
        mid: Mid,
        aref: AttId,
        gref: Gid,
        name_gen: &mut NameGenerator,
    ) -> Result<(String, InsertOutcome)> {
        let pv = [
            self.pv_for_index(indices.0),
            self.pv_for_index(indices.1),
            self.pv_for_index(indices.2),
            self.pv_for_index(indices.3),
        ];
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        let face = MeshFace::quad_by_index(common, indices.0, indices.1, indices.2, indices.3, pv);
        self.add_face(face, name_gen)
    }

    fn add_face(&mut self, face: MeshFace, name_gen: &mut NameGenerator) -> Result<(String, InsertOutcome)> {
        let bounding = face.bounding_edges();
        let mid = face.common.mid;
        let aref = face.common.aref;
        let gref = face.common.gref;
        let result = self.faces.add(face)?;
        if let Some(edges) = bounding {
            for (i1, i2) in edges {
                if self.face_edges.get_by_hash(hash_edge(i1, i2)).is_some() {
                    continue;
                }
                let edge_name = name_gen.next_name(ElementKind::Edge);
                let common = TopoCommon::new(mid, aref, gref, edge_name, 0);
                let edge = MeshEdge::by_index(common, i1, i2, self.pv_for_index(i1), self.pv_for_index(i2));
                self.face_edges.add(edge)?;
            }
        }
        Ok(result)
    }

    /// Adds a reference-form face: identified by an opaque string rather
    /// than an index tuple, so no bounding-edge cascade is possible (there
    /// are no indices to derive edges from).
    pub fn add_face_by_ref(
        &mut self,
        name: impl Into<String>,
        r: impl Into<String>,
        shape: FaceShape,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        let face = MeshFace::by_ref(common, r, shape, [None, None, None, None]);
        self.faces.add(face)
    }

    pub fn faces(&self) -> &ElementTable<MeshFace> {
        &self.faces
    }

    pub fn face_edges(&self) -> &ElementTable<MeshEdge> {
        &self.face_edges
    }

    pub fn add_param_vertex(&mut self, vref: impl Into<String>, pv: ParamVertex) -> Result<()> {
        self.param_vertices.add(vref, pv)
    }

    pub fn param_vertices(&self) -> &ParamVertexTable {
        &self.param_vertices
    }

    pub fn find_face_by_inds(&self, i1: i64, i2: i64, i3: i64, i4: i64) -> Option<&MeshFace> {
        self.faces.get_by_hash(crate::ids::hash_face(i1, i2, i3, i4))
    }

    pub fn find_face_edge_by_inds(&self, i1: i64, i2: i64) -> Option<&MeshEdge> {
        self.face_edges.get_by_hash(hash_edge(i1, i2))
    }
}

/// A `MeshModel` stores its sheets in an `ElementTable` keyed by name;
/// sheets have no canonical index hash of their own, but a
/// `<MeshSheetReference>` element's `ref` attribute is a reference key
/// exactly like `MeshFace`/`MeshEdge`'s by-ref forms, so a duplicate
/// `ref` within a model is exists-ok rather than a name collision.
impl TopoElement for MeshSheet {
    fn common(&self) -> &TopoCommon {
        &self.common
    }
    fn common_mut(&mut self) -> &mut TopoCommon {
        &mut self.common
    }
    fn hash_key(&self) -> Option<IndexTag> {
        None
    }
    fn ref_key(&self) -> Option<&str> {
        self.ref_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> MeshSheet {
        MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)
    }

    #[test]
    fn adding_triangle_cascades_three_bounding_edges() {
        let mut sheet = sheet();
        let mut gen = NameGenerator::new();
        sheet
            .add_tri_by_index("f0", (1, 2, 3), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        assert_eq!(sheet.faces().len(), 1);
        assert_eq!(sheet.face_edges().len(), 3);
        assert!(sheet.find_face_edge_by_inds(1, 2).is_some());
        assert!(sheet.find_face_edge_by_inds(2, 3).is_some());
        assert!(sheet.find_face_edge_by_inds(3, 1).is_some());
    }

    #[test]
    fn adjacent_triangles_share_the_common_edge() {
        let mut sheet = sheet();
        let mut gen = NameGenerator::new();
        sheet
            .add_tri_by_index("f0", (1, 2, 3), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        sheet
            .add_tri_by_index("f1", (2, 4, 3), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        // Triangle 1 contributes edges (1,2) (2,3) (3,1); triangle 2 contributes
        // (2,4) (4,3) (3,2) -- (3,2) already exists as (2,3).
        assert_eq!(sheet.faces().len(), 2);
        assert_eq!(sheet.face_edges().len(), 5);
    }

    #[test]
    fn quad_and_triangle_over_same_three_indices_do_not_collide() {
        let mut sheet = sheet();
        let mut gen = NameGenerator::new();
        sheet
            .add_tri_by_index("f0", (1, 2, 3), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        sheet
            .add_quad_by_index("f1", (1, 2, 3, 4), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        assert_eq!(sheet.faces().len(), 2);
    }
}
