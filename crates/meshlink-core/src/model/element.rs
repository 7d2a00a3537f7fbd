//! Mesh topology elements: `MeshPoint`, `MeshEdge`, `MeshFace`, and the
//! fields/identity scheme they share.
//!
//! Each element comes in one of two disjoint forms (see DESIGN.md for why
//! this is modeled as a dedicated key enum per element kind rather than one
//! shared `ElementKey<N>`): a by-index form, identified by its canonical
//! unordered-index hash, or a by-reference form, identified by an opaque
//! reference string. The two forms never share identity even when they
//! happen to coexist in the same container.

use crate::ids::{hash_edge, hash_face, hash_point, AttId, Gid, IndexTag, Mid, INDEX_UNUSED};
use crate::model::element_table::TopoElement;
use crate::model::param_vertex::ParamVertex;
use serde::{Deserialize, Serialize};

/// Fields shared by every mesh topology object: points, edges, faces, and
/// the containers themselves (`MeshString`/`MeshSheet`/`MeshModel`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoCommon {
    pub mid: Mid,
    pub aref: AttId,
    pub gref: Gid,
    pub name: String,
    /// Monotonic insertion-order counter, assigned once at creation and
    /// never reused; the sole basis for deterministic enumeration order
    /// (do not sort by hash or name).
    pub order: u64,
}

impl TopoCommon {
    pub fn new(mid: Mid, aref: AttId, gref: Gid, name: String, order: u64) -> Self {
        TopoCommon { mid, aref, gref, name, order }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointKey {
    Index(i64),
    Ref(String),
}

impl PointKey {
    pub fn hash(&self) -> Option<IndexTag> {
        match self {
            PointKey::Index(i1) => Some(hash_point(*i1)),
            PointKey::Ref(_) => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            PointKey::Ref(r) => Some(r),
            PointKey::Index(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub common: TopoCommon,
    pub key: PointKey,
    pub param_vertex: Option<ParamVertex>,
}

impl MeshPoint {
    pub fn by_index(common: TopoCommon, i1: i64, pv: Option<ParamVertex>) -> Self {
        MeshPoint { common, key: PointKey::Index(i1), param_vertex: pv }
    }

    pub fn by_ref(common: TopoCommon, r: impl Into<String>, pv: Option<ParamVertex>) -> Self {
        MeshPoint { common, key: PointKey::Ref(r.into()), param_vertex: pv }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeKey {
    Index(i64, i64),
    Ref(String),
}

impl EdgeKey {
    pub fn hash(&self) -> Option<IndexTag> {
        match self {
            EdgeKey::Index(i1, i2) => Some(hash_edge(*i1, *i2)),
            EdgeKey::Ref(_) => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            EdgeKey::Ref(r) => Some(r),
            EdgeKey::Index(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEdge {
    pub common: TopoCommon,
    pub key: EdgeKey,
    pub param_vertices: [Option<ParamVertex>; 2],
}

impl MeshEdge {
    pub fn by_index(common: TopoCommon, i1: i64, i2: i64, pv1: Option<ParamVertex>, pv2: Option<ParamVertex>) -> Self {
        MeshEdge { common, key: EdgeKey::Index(i1, i2), param_vertices: [pv1, pv2] }
    }

    pub fn by_ref(common: TopoCommon, r: impl Into<String>, pv1: Option<ParamVertex>, pv2: Option<ParamVertex>) -> Self {
        MeshEdge { common, key: EdgeKey::Ref(r.into()), param_vertices: [pv1, pv2] }
    }

    pub fn num_param_verts(&self) -> usize {
        self.param_vertices.iter().filter(|p| p.is_some()).count()
    }

    /// Endpoint indices, if this is a by-index edge.
    pub fn indices(&self) -> Option<(i64, i64)> {
        match self.key {
            EdgeKey::Index(i1, i2) => Some((i1, i2)),
            EdgeKey::Ref(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceShape {
    Tri3,
    Quad4,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FaceKey {
    /// `i4` is `None` for a triangular face.
    Index(i64, i64, i64, Option<i64>),
    Ref(String),
}

impl FaceKey {
    pub fn hash(&self) -> Option<IndexTag> {
        match self {
            FaceKey::Index(i1, i2, i3, i4) => Some(hash_face(*i1, *i2, *i3, i4.unwrap_or(INDEX_UNUSED))),
            FaceKey::Ref(_) => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            FaceKey::Ref(r) => Some(r),
            FaceKey::Index(..) => None,
        }
    }

    pub fn shape(&self) -> Option<FaceShape> {
        match self {
            FaceKey::Index(_, _, _, Some(_)) => Some(FaceShape::Quad4),
            FaceKey::Index(_, _, _, None) => Some(FaceShape::Tri3),
            FaceKey::Ref(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    pub common: TopoCommon,
    pub key: FaceKey,
    /// Up to 4 ParamVertex copies; slot 3 is unused for a triangular face.
    pub param_vertices: [Option<ParamVertex>; 4],
    /// The declared `etype` for a by-reference face. A reference-form face
    /// has no indices to derive `Tri3`/`Quad4` from, but §4.8 still requires
    /// `etype` to be declared on the element and reproduced on write, so it
    /// travels alongside the reference string. Always `None` for by-index
    /// faces, whose shape is derived from `key` instead.
    pub ref_shape: Option<FaceShape>,
}

impl MeshFace {
    pub fn tri_by_index(
        common: TopoCommon,
        i1: i64,
        i2: i64,
        i3: i64,
        pv: [Option<ParamVertex>; 3],
    ) -> Self {
        MeshFace {
            common,
            key: FaceKey::Index(i1, i2, i3, None),
            param_vertices: [pv[0], pv[1], pv[2], None],
            ref_shape: None,
        }
    }

    pub fn quad_by_index(
        common: TopoCommon,
        i1: i64,
        i2: i64,
        i3: i64,
        i4: i64,
        pv: [Option<ParamVertex>; 4],
    ) -> Self {
        MeshFace {
            common,
            key: FaceKey::Index(i1, i2, i3, Some(i4)),
            param_vertices: pv,
            ref_shape: None,
        }
    }

    pub fn by_ref(common: TopoCommon, r: impl Into<String>, shape: FaceShape, pv: [Option<ParamVertex>; 4]) -> Self {
        MeshFace { common, key: FaceKey::Ref(r.into()), param_vertices: pv, ref_shape: Some(shape) }
    }

    /// The face's shape, whether declared via indices or carried alongside
    /// a reference string.
    pub fn shape(&self) -> Option<FaceShape> {
        self.key.shape().or(self.ref_shape)
    }

    pub fn num_param_verts(&self) -> usize {
        self.param_vertices.iter().filter(|p| p.is_some()).count()
    }

    /// The point indices bounding this face, in declaration order, if this
    /// is a by-index face.
    pub fn indices(&self) -> Option<Vec<i64>> {
        match self.key {
            FaceKey::Index(i1, i2, i3, i4) => {
                let mut v = vec![i1, i2, i3];
                if let Some(i4) = i4 {
                    v.push(i4);
                }
                Some(v)
            }
            FaceKey::Ref(_) => None,
        }
    }

    /// The edges bounding this face (as unordered index pairs), used when
    /// cascading a face add into its sheet's face-edges.
    pub fn bounding_edges(&self) -> Option<Vec<(i64, i64)>> {
        let idx = self.indices()?;
        let n = idx.len();
        Some((0..n).map(|k| (idx[k], idx[(k + 1) % n])).collect())
    }
}

impl TopoElement for MeshPoint {
    fn common(&self) -> &TopoCommon {
        &self.common
    }
    fn common_mut(&mut self) -> &mut TopoCommon {
        &mut self.common
    }
    fn hash_key(&self) -> Option<IndexTag> {
        self.key.hash()
    }
    fn ref_key(&self) -> Option<&str> {
        self.key.reference()
    }
}

impl TopoElement for MeshEdge {
    fn common(&self) -> &TopoCommon {
        &self.common
    }
    fn common_mut(&mut self) -> &mut TopoCommon {
        &mut self.common
    }
    fn hash_key(&self) -> Option<IndexTag> {
        self.key.hash()
    }
    fn ref_key(&self) -> Option<&str> {
        self.key.reference()
    }
}

impl TopoElement for MeshFace {
    fn common(&self) -> &TopoCommon {
        &self.common
    }
    fn common_mut(&mut self) -> &mut TopoCommon {
        &mut self.common
    }
    fn hash_key(&self) -> Option<IndexTag> {
        self.key.hash()
    }
    fn ref_key(&self) -> Option<&str> {
        self.key.reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common(order: u64) -> TopoCommon {
        TopoCommon::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, format!("e{order}"), order)
    }

    #[test]
    fn triangle_bounding_edges_wrap_around() {
        let face = MeshFace::tri_by_index(common(0), 1, 2, 3, [None, None, None]);
        assert_eq!(face.bounding_edges().unwrap(), vec![(1, 2), (2, 3), (3, 1)]);
    }

    #[test]
    fn quad_bounding_edges_wrap_around() {
        let face = MeshFace::quad_by_index(common(0), 1, 2, 3, 4, [None, None, None, None]);
        assert_eq!(face.bounding_edges().unwrap(), vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
    }

    #[test]
    fn by_ref_face_has_no_indices() {
        let face = MeshFace::by_ref(common(0), "f1", FaceShape::Tri3, [None, None, None, None]);
        assert!(face.indices().is_none());
        assert!(face.key.hash().is_none());
        assert_eq!(face.key.reference(), Some("f1"));
        assert_eq!(face.shape(), Some(FaceShape::Tri3));
    }
}
