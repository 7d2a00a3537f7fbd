//! `MeshModel`: the container of `MeshSheet`s and `MeshString`s that also
//! owns the model-scope point/edge caches the original's "lowest/highest
//! topology" lookups walk through.
//!
//! A model does not own sheet or string edges directly; it owns three
//! caches *implied* by them (`edge_points`, `face_edge_points`,
//! `face_edges`, see §3) plus the model's own directly-declared
//! `MeshPoint`s. The cache population happens as a side effect of the
//! `add_tri_face`/`add_quad_face`/`add_string_edge` wrappers below, which
//! is why callers go through `MeshModel` rather than mutating a
//! `MeshSheet`/`MeshString` obtained by name directly when adding faces or
//! edges.

use crate::error::{MeshLinkError, Result};
use crate::ids::{hash_edge, AttId, Gid, IndexTag, Mid};
use crate::model::element::{MeshEdge, MeshFace, MeshPoint, TopoCommon};
use crate::model::element_table::{ElementTable, InsertOutcome, TopoElement};
use crate::model::mesh_sheet::MeshSheet;
use crate::model::mesh_string::MeshString;
use crate::model::param_vertex::{ParamVertex, ParamVertexTable};
use crate::name_gen::NameGenerator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshModel {
    pub common: TopoCommon,
    sheets: ElementTable<MeshSheet>,
    strings: ElementTable<MeshString>,
    /// MeshPoints declared directly at model scope.
    points: ElementTable<MeshPoint>,
    /// The 0-cells implied by the model's MeshStrings.
    edge_points: ElementTable<MeshPoint>,
    /// The 0-cells implied by the model's MeshSheets.
    face_edge_points: ElementTable<MeshPoint>,
    /// MeshEdges implied by MeshSheet faces, mirrored here from each
    /// sheet's own face-edge table for cross-sheet lookup.
    face_edges: ElementTable<MeshEdge>,
    param_vertices: ParamVertexTable,
}

impl MeshModel {
    pub fn new(mid: Mid, aref: AttId, gref: Gid, name: impl Into<String>, order: u64) -> Self {
        MeshModel {
            common: TopoCommon::new(mid, aref, gref, name.into(), order),
            sheets: ElementTable::new(),
            strings: ElementTable::new(),
            points: ElementTable::new(),
            edge_points: ElementTable::new(),
            face_edge_points: ElementTable::new(),
            face_edges: ElementTable::new(),
            param_vertices: ParamVertexTable::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    fn pv_for_index(&self, i: i64) -> Option<ParamVertex> {
        self.param_vertices.get_by_vref(&i.to_string()).copied()
    }

    pub fn add_param_vertex(&mut self, vref: impl Into<String>, pv: ParamVertex) -> Result<()> {
        self.param_vertices.add(vref, pv)
    }

    pub fn param_vertices(&self) -> &ParamVertexTable {
        &self.param_vertices
    }

    // -- sheets / strings ---------------------------------------------

    pub fn add_sheet(&mut self, sheet: MeshSheet) -> Result<(String, InsertOutcome)> {
        self.sheets.add(sheet)
    }

    pub fn add_string(&mut self, string: MeshString) -> Result<(String, InsertOutcome)> {
        self.strings.add(string)
    }

    pub fn sheets(&self) -> &ElementTable<MeshSheet> {
        &self.sheets
    }

    pub fn strings(&self) -> &ElementTable<MeshString> {
        &self.strings
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&MeshSheet> {
        self.sheets.get_by_name(name)
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut MeshSheet> {
        self.sheets.get_by_name_mut(name)
    }

    pub fn string_by_name(&self, name: &str) -> Option<&MeshString> {
        self.strings.get_by_name(name)
    }

    pub fn string_by_name_mut(&mut self, name: &str) -> Option<&mut MeshString> {
        self.strings.get_by_name_mut(name)
    }

    pub fn sheet_by_ref(&self, r: &str) -> Option<&MeshSheet> {
        self.sheets.get_by_ref(r)
    }

    pub fn string_by_ref(&self, r: &str) -> Option<&MeshString> {
        self.strings.get_by_ref(r)
    }

    // -- model-scope MeshPoints -----------------------------------------

    pub fn add_point_by_index(
        &mut self,
        name: impl Into<String>,
        i1: i64,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let pv = self.pv_for_index(i1);
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        self.points.add(MeshPoint::by_index(common, i1, pv))
    }

    pub fn add_point_by_ref(
        &mut self,
        name: impl Into<String>,
        r: impl Into<String>,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let common = TopoCommon::new(mid, aref, gref, name.into(), 0);
        self.points.add(MeshPoint::by_ref(common, r, None))
    }

    /// Adds a reference-form edge to the named string. No cascade into
    /// `edge_points`: a reference-form edge carries no indices to derive
    /// endpoint point-indices from.
    pub fn add_string_edge_by_ref(
        &mut self,
        string_name: &str,
        name: impl Into<String>,
        r: impl Into<String>,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let string = self
            .strings
            .get_by_name_mut(string_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh string '{string_name}'")))?;
        string.add_edge_by_ref(name, r, mid, aref, gref)
    }

    /// Adds a reference-form face to the named sheet. No cascade into
    /// `face_edges`/`face_edge_points` for the same reason.
    pub fn add_sheet_face_by_ref(
        &mut self,
        sheet_name: &str,
        name: impl Into<String>,
        r: impl Into<String>,
        shape: crate::model::element::FaceShape,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let sheet = self
            .sheets
            .get_by_name_mut(sheet_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh sheet '{sheet_name}'")))?;
        sheet.add_face_by_ref(name, r, shape, mid, aref, gref)
    }

    pub fn points(&self) -> &ElementTable<MeshPoint> {
        &self.points
    }

    pub fn edge_points(&self) -> &ElementTable<MeshPoint> {
        &self.edge_points
    }

    pub fn face_edge_points(&self) -> &ElementTable<MeshPoint> {
        &self.face_edge_points
    }

    pub fn face_edges(&self) -> &ElementTable<MeshEdge> {
        &self.face_edges
    }

    // -- cascading inserts ------------------------------------------------

    /// Adds an edge to the named string, then registers each endpoint as a
    /// model-scope edge-point if it isn't one already.
    pub fn add_string_edge_by_index(
        &mut self,
        string_name: &str,
        name: impl Into<String>,
        i1: i64,
        i2: i64,
        mid: Mid,
        aref: AttId,
        gref: Gid,
    ) -> Result<(String, InsertOutcome)> {
        let string = self
            .strings
            .get_by_name_mut(string_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh string '{string_name}'")))?;
        let result = string.add_edge_by_index(name, i1, i2, mid, aref, gref)?;
        for i in [i1, i2] {
            if self.edge_points.get_by_hash(crate::ids::hash_point(i)).is_some() {
                continue;
            }
            let pv = self.pv_for_index(i);
            let point_name = format!("{string_name}.edge_point.{i}");
            let common = TopoCommon::new(Mid::INVALID, AttId::INVALID, gref, point_name, 0);
            self.edge_points.add(MeshPoint::by_index(common, i, pv))?;
        }
        Ok(result)
    }

    /// Adds a triangular face to the named sheet, then mirrors its
    /// bounding edges into this model's face-edge cache and their
    /// endpoints into its face-edge-point cache.
    pub fn add_sheet_tri_by_index(
        &mut self,
        sheet_name: &str,
        name: impl Into<String>,
        indices: (i64, i64, i64),
        mid: Mid,
        aref: AttId,
        gref: Gid,
        name_gen: &mut NameGenerator,
    ) -> Result<(String, InsertOutcome)> {
        let sheet = self
            .sheets
            .get_by_name_mut(sheet_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh sheet '{sheet_name}'")))?;
        let result = sheet.add_tri_by_index(name, indices, mid, aref, gref, name_gen)?;
        self.cascade_sheet_face(sheet_name, &[indices.0, indices.1, indices.2], gref)?;
        Ok(result)
    }

    /// As `add_sheet_tri_by_index`, for a quadrilateral face.
    pub fn add_sheet_quad_by_index(
        &mut self,
        sheet_name: &str,
        name: impl Into<String>,
        indices: (i64, i64, i64, i64),
        mid: Mid,
        aref: AttId,
        gref: Gid,
        name_gen: &mut NameGenerator,
    ) -> Result<(String, InsertOutcome)> {
        let sheet = self
            .sheets
            .get_by_name_mut(sheet_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh sheet '{sheet_name}'")))?;
        let result = sheet.add_quad_by_index(name, indices, mid, aref, gref, name_gen)?;
        self.cascade_sheet_face(sheet_name, &[indices.0, indices.1, indices.2, indices.3], gref)?;
        Ok(result)
    }

    fn cascade_sheet_face(&mut self, sheet_name: &str, indices: &[i64], gref: Gid) -> Result<()> {
        let n = indices.len();
        let bounding: Vec<(i64, i64)> = (0..n).map(|k| (indices[k], indices[(k + 1) % n])).collect();
        let sheet = self
            .sheets
            .get_by_name(sheet_name)
            .ok_or_else(|| MeshLinkError::NotFound(format!("mesh sheet '{sheet_name}'")))?;
        for (i1, i2) in &bounding {
            if self.face_edges.get_by_hash(hash_edge(*i1, *i2)).is_none() {
                if let Some(edge) = sheet.find_face_edge_by_inds(*i1, *i2) {
                    self.face_edges.add(edge.clone())?;
                }
            }
            for i in [*i1, *i2] {
                if self.face_edge_points.get_by_hash(crate::ids::hash_point(i)).is_some() {
                    continue;
                }
                let pv = self.pv_for_index(i);
                let point_name = format!("{sheet_name}.face_edge_point.{i}");
                let common = TopoCommon::new(Mid::INVALID, AttId::INVALID, gref, point_name, 0);
                self.face_edge_points.add(MeshPoint::by_index(common, i, pv))?;
            }
        }
        Ok(())
    }

    // -- lowest/highest topology lookups ----------------------------------

    /// "Innermost definition wins": string-scope edge-points, then
    /// sheet-scope face-edge-points, then the model's own MeshPoints.
    pub fn find_lowest_topo_point_by_ind(&self, i: i64) -> Option<&MeshPoint> {
        let hash = crate::ids::hash_point(i);
        self.edge_points
            .get_by_hash(hash)
            .or_else(|| self.face_edge_points.get_by_hash(hash))
            .or_else(|| self.points.get_by_hash(hash))
    }

    /// The reverse search order: model MeshPoints first, then
    /// face-edge-points, then edge-points.
    pub fn find_highest_topo_point_by_ind(&self, i: i64) -> Option<&MeshPoint> {
        let hash = crate::ids::hash_point(i);
        self.points
            .get_by_hash(hash)
            .or_else(|| self.face_edge_points.get_by_hash(hash))
            .or_else(|| self.edge_points.get_by_hash(hash))
    }

    /// Searches the model's strings directly (by unordered index pair),
    /// then falls back to the model-level face-edges cache.
    pub fn find_lowest_topo_edge_by_inds(&self, i1: i64, i2: i64) -> Option<&MeshEdge> {
        let hash = hash_edge(i1, i2);
        for string in self.strings.iter_in_order() {
            if let Some(edge) = string.edges().get_by_hash(hash) {
                return Some(edge);
            }
        }
        self.face_edges.get_by_hash(hash)
    }

    /// Searches every owned sheet's faces for the unordered index set.
    pub fn find_face_by_inds(&self, i1: i64, i2: i64, i3: i64, i4: i64) -> Option<&MeshFace> {
        let hash = crate::ids::hash_face(i1, i2, i3, i4);
        for sheet in self.sheets.iter_in_order() {
            if let Some(face) = sheet.faces().get_by_hash(hash) {
                return Some(face);
            }
        }
        None
    }
}

/// A `MeshAssociativity` façade stores its models in an `ElementTable`
/// keyed by name alone, same as sheets/strings within a model.
impl TopoElement for MeshModel {
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
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::INDEX_UNUSED;

    fn model() -> MeshModel {
        MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "m0", 0)
    }

    #[test]
    fn lowest_and_highest_topo_point_favor_opposite_scopes() {
        let mut m = model();
        m.add_string(MeshString::new(Mid::INVALID, AttId::INVALID, Gid::from(1), "s0", 0)).unwrap();
        m.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::from(2), "sh0", 0)).unwrap();
        let mut gen = NameGenerator::new();

        m.add_string_edge_by_index("s0", "e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::from(1)).unwrap();
        m.add_sheet_tri_by_index("sh0", "f0", (2, 3, 4), Mid::INVALID, AttId::INVALID, Gid::from(2), &mut gen)
            .unwrap();
        m.add_point_by_index("p2", 2, Mid::INVALID, AttId::INVALID, Gid::from(3)).unwrap();

        // Index 2 exists at all three scopes: edge-point (string), face-edge-point
        // (sheet), and model MeshPoint. Lowest favors the string-scope record;
        // highest favors the model-scope record.
        let lowest = m.find_lowest_topo_point_by_ind(2).unwrap();
        assert_eq!(lowest.common.gref, Gid::from(1));
        let highest = m.find_highest_topo_point_by_ind(2).unwrap();
        assert_eq!(highest.common.gref, Gid::from(3));
    }

    #[test]
    fn lowest_topo_edge_prefers_string_scope_over_face_edges() {
        let mut m = model();
        m.add_string(MeshString::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "s0", 0)).unwrap();
        m.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
        let mut gen = NameGenerator::new();

        m.add_sheet_tri_by_index("sh0", "f0", (1, 2, 3), Mid::INVALID, AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        assert!(m.find_lowest_topo_edge_by_inds(1, 2).is_some());

        m.add_string_edge_by_index("s0", "e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::INVALID).unwrap();
        // Both scopes now have (1,2); the string-owned one must win.
        let found = m.find_lowest_topo_edge_by_inds(1, 2).unwrap();
        assert_eq!(found.common.name, "e0");
    }

    #[test]
    fn cascading_a_face_registers_face_edges_and_face_edge_points_at_model_scope() {
        let mut m = model();
        m.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
        let mut gen = NameGenerator::new();
        m.add_sheet_quad_by_index(
            "sh0",
            "f0",
            (1, 2, 3, 4),
            Mid::INVALID,
            AttId::INVALID,
            Gid::INVALID,
            &mut gen,
        )
        .unwrap();
        assert_eq!(m.face_edges().len(), 4);
        assert_eq!(m.face_edge_points().len(), 4);
        assert!(m.find_face_by_inds(1, 2, 3, 4).is_some());
        assert!(m.find_face_by_inds(1, 2, 3, INDEX_UNUSED).is_none());
    }
}
