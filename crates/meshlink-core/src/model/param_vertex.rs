//! Parametric vertex coordinates: the (u, v) location of a mesh vertex on a
//! geometric entity.

use crate::error::{MeshLinkError, Result};
use crate::ids::{Gid, Mid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `ParamVertex`: non-empty `vref` unique within its owning
/// topology container, a required geometry-group reference, and `(u, v)`
/// parametric coordinates. For a 1D curve entity only `u` is meaningful;
/// `v` is `0.0` in that case. `dim` (1 or 2) records which of those was
/// actually declared, independent of whether `v` happens to be zero, so a
/// surface vertex sitting at `v == 0.0` still round-trips as `dim="2"`
/// instead of being misread back as a curve vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamVertex {
    pub gref: Gid,
    pub mid: Mid,
    pub u: f64,
    pub v: f64,
    pub dim: u8,
}

impl ParamVertex {
    pub fn new(gref: Gid, mid: Mid, u: f64, v: f64) -> Self {
        ParamVertex { gref, mid, u, v, dim: 2 }
    }

    pub fn curve(gref: Gid, u: f64) -> Self {
        ParamVertex { gref, mid: Mid::INVALID, u, v: 0.0, dim: 1 }
    }

    pub fn surface(gref: Gid, u: f64, v: f64) -> Self {
        ParamVertex { gref, mid: Mid::INVALID, u, v, dim: 2 }
    }
}

/// Per-topology-container map from `vref` to `ParamVertex`, with a
/// secondary index from `mid` back to `vref` when an id was supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamVertexTable {
    by_vref: HashMap<String, ParamVertex>,
    by_id: HashMap<Mid, String>,
}

impl ParamVertexTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vref: impl Into<String>, pv: ParamVertex) -> Result<()> {
        let vref = vref.into();
        if vref.is_empty() {
            return Err(MeshLinkError::ParseError("ParamVertex vref must not be empty".into()));
        }
        if self.by_vref.contains_key(&vref) {
            return Err(MeshLinkError::Duplicate(format!("ParamVertex with vref '{vref}'")));
        }
        if pv.mid.is_valid() {
            self.by_id.insert(pv.mid, vref.clone());
        }
        self.by_vref.insert(vref, pv);
        Ok(())
    }

    pub fn get_by_vref(&self, vref: &str) -> Option<&ParamVertex> {
        self.by_vref.get(vref)
    }

    pub fn get_by_id(&self, mid: Mid) -> Option<&ParamVertex> {
        self.by_id.get(&mid).and_then(|vref| self.by_vref.get(vref))
    }

    pub fn len(&self) -> usize {
        self.by_vref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vref.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamVertex)> {
        self.by_vref.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_vref_and_by_id() {
        let mut table = ParamVertexTable::new();
        table.add("v1", ParamVertex::new(Gid(1), Mid(5), 0.5, 0.0)).unwrap();
        assert_eq!(table.get_by_vref("v1").unwrap().u, 0.5);
        assert_eq!(table.get_by_id(Mid(5)).unwrap().u, 0.5);
        assert!(table.get_by_id(Mid(6)).is_none());
    }

    #[test]
    fn duplicate_vref_rejected() {
        let mut table = ParamVertexTable::new();
        table.add("v1", ParamVertex::curve(Gid(1), 0.0)).unwrap();
        assert!(table.add("v1", ParamVertex::curve(Gid(2), 1.0)).is_err());
    }

    #[test]
    fn empty_vref_rejected() {
        let mut table = ParamVertexTable::new();
        assert!(table.add("", ParamVertex::curve(Gid(1), 0.0)).is_err());
    }
}
