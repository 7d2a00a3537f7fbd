//! `MeshString`: an ordered container of `MeshEdge`s sharing a curve.
//!
//! Mirrors the original `MeshStr` class: a string owns its edges and the
//! `ParamVertex` records declared on those edges' endpoints, and otherwise
//! behaves like any other topology container (name, optional `mid`,
//! optional attribute/geometry-group reference).

use crate::error::Result;
use crate::ids::{AttId, Gid, IndexTag, Mid};
use crate::model::element::{EdgeKey, MeshEdge, TopoCommon};
use crate::model::element_table::{ElementTable, InsertOutcome, TopoElement};
use crate::model::param_vertex::{ParamVertex, ParamVertexTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshString {
    pub common: TopoCommon,
    /// The `ref` attribute, tracked independently of `common.name` (the
    /// original keeps separate `getMeshStringByName`/`getMeshStringByRef`
    /// lookup tables rather than one identity). `Some` exactly when this
    /// string was parsed from a `<MeshStringReference>` element, which is
    /// also what the writer consults to pick the tag back on write.
    pub ref_id: Option<String>,
    edges: ElementTable<MeshEdge>,
    param_vertices: ParamVertexTable,
}

impl MeshString {
    pub fn new(mid: Mid, aref: AttId, gref: Gid, name: impl Into<String>, order: u64) -> Self {
        MeshString {
            common: TopoCommon::new(mid, aref, gref, name.into(), order),
            ref_id: None,
            edges: ElementTable::new(),
            param_vertices: ParamVertexTable::new(),
        }
    }

    /// As [`Self::new`], additionally recording the `ref` attribute a
    /// `<MeshStringReference>` element declared.
    pub fn with_ref(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    /// Looks up the ParamVertex registered for point index `i` in this
    /// string's table, keyed by the integer-to-string conversion of the
    /// index (see §4.8's per-element lookup rule).
    fn pv_for_index(&self, i: i64) -> Option<ParamVertex> {
        self.param_vertices.get_by_vref(&i.to_string()).copied()
    }

    /// Adds an edge keyed by its two point indices. Exists-ok if an edge
    /// with the same unordered index pair is already present. Each
    /// endpoint's ParamVertex, if registered in this string's table, is
    /// attached automatically.
    pub fn add_edge_by_index(
        &mut self,
        name: impl Into<String>,
        i1: i64,
        i2: i64,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        let edge = MeshEdge::by_index(common, i1, i2, self.pv_for_index(i1), self.pv_for_index(i2));
        self.edges.add(edge)
    }

    pub fn add_edge_by_ref(
        &mut self,
        name: impl Into<String>,
        r: impl Into<String>,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        let edge = MeshEdge::by_ref(common, r, None, None);
        self.edges.add(edge)
    }

    pub fn edges(&self) -> &ElementTable<MeshEdge> {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut ElementTable<MeshEdge> {
        &mut self.edges
    }

    pub fn add_param_vertex(&mut self, vref: impl Into<String>, pv: ParamVertex) -> Result<()> {
        self.param_vertices.add(vref, pv)
    }

    pub fn param_vertices(&self) -> &ParamVertexTable {
        &self.param_vertices
    }

    /// Finds an edge by its unordered index pair, searching only this
    /// string's own edges.
    pub fn find_edge_by_inds(&self, i1: i64, i2: i64) -> Option<&MeshEdge> {
        self.edges.get_by_hash(crate::ids::hash_edge(i1, i2))
    }

    pub fn find_edge_by_ref(&self, r: &str) -> Option<&MeshEdge> {
        self.edges.get_by_ref(r)
    }

    /// Every point index referenced by this string's edges, in edge
    /// creation order, duplicates included as they occur.
    pub fn referenced_point_indices(&self) -> Vec<i64> {
        let mut out = Vec::new();
        for edge in self.edges.iter_in_order() {
            if let EdgeKey::Index(i1, i2) = edge.key {
                out.push(i1);
                out.push(i2);
            }
        }
        out
    }
}

/// A `MeshModel` stores its strings in an `ElementTable` keyed by name;
/// strings have no canonical index hash of their own, but a
/// `<MeshStringReference>` element's `ref` attribute is a reference key
/// exactly like `MeshFace`/`MeshEdge`'s by-ref forms, so a duplicate
/// `ref` within a model is exists-ok rather than a name collision.
impl TopoElement for MeshString {
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

    fn string() -> MeshString {
        MeshString::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "s0", 0)
    }

    #[test]
    fn add_and_find_edge_by_index() {
        let mut s = string();
        s.add_edge_by_index("e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        assert!(s.find_edge_by_inds(1, 2).is_some());
        assert!(s.find_edge_by_inds(2, 1).is_some());
        assert!(s.find_edge_by_inds(3, 4).is_none());
    }

    #[test]
    fn re_adding_same_edge_index_pair_is_exists_ok() {
        let mut s = string();
        s.add_edge_by_index("e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        let (name, outcome) =
            s.add_edge_by_index("e1", 2, 1, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        assert_eq!(outcome, InsertOutcome::AlreadyExists);
        assert_eq!(name, "e0");
        assert_eq!(s.edges().len(), 1);
    }

    #[test]
    fn referenced_point_indices_follows_insertion_order() {
        let mut s = string();
        s.add_edge_by_index("e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        s.add_edge_by_index("e1", 2, 3, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        assert_eq!(s.referenced_point_indices(), vec![1, 2, 2, 3]);
    }
}
