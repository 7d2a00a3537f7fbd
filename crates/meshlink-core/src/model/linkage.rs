//! Element-linkage and transform store (§4.6): pairs of entity references
//! plus 4x4 quaternion transforms used for periodic/translational links
//! between mesh entities.
//!
//! Both stores are process-neutral: linkages are owned by the façade,
//! transforms stored by value. Cross-reference validation (that
//! `source_ref`/`target_ref` resolve to a real sheet or string, that
//! `xref` resolves to a real transform) is the façade's job, since it is
//! the only layer that can see every model at once.

use crate::error::{MeshLinkError, Result};
use crate::ids::{AttId, Xid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshElementLinkage {
    pub name: String,
    pub source_ref: String,
    pub target_ref: String,
    pub aref: AttId,
    pub xref: Xid,
}

impl MeshElementLinkage {
    pub fn new(
        name: impl Into<String>,
        source_ref: impl Into<String>,
        target_ref: impl Into<String>,
        aref: AttId,
        xref: Xid,
    ) -> Self {
        MeshElementLinkage {
            name: name.into(),
            source_ref: source_ref.into(),
            target_ref: target_ref.into(),
            aref,
            xref,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkageStore {
    linkages: HashMap<String, MeshElementLinkage>,
}

impl LinkageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `linkage`. Rejects a name collision; does not itself check
    /// that `source_ref`/`target_ref`/`xref` resolve to anything, since
    /// that requires visibility into every model (the façade's job, see
    /// `MeshAssociativity::add_linkage`).
    pub fn add(&mut self, linkage: MeshElementLinkage) -> Result<()> {
        if self.linkages.contains_key(&linkage.name) {
            return Err(MeshLinkError::Duplicate(format!("mesh element linkage '{}'", linkage.name)));
        }
        self.linkages.insert(linkage.name.clone(), linkage);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&MeshElementLinkage> {
        self.linkages.get(name)
    }

    pub fn len(&self) -> usize {
        self.linkages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linkages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshElementLinkage> {
        self.linkages.values()
    }
}

/// A 4x4 quaternion transform matrix, stored column-major, matching the
/// original's 16-float `Transform` content block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshLinkTransform {
    pub xid: Xid,
    pub aref: AttId,
    pub matrix: [f64; 16],
}

impl MeshLinkTransform {
    /// Builds a transform from exactly 16 floats. `ParseError` if `values`
    /// has any other length, mirroring the "contents do not parse as
    /// exactly 16 numbers" invariant in §3.
    pub fn new(xid: Xid, aref: AttId, values: &[f64]) -> Result<Self> {
        let matrix: [f64; 16] = values
            .try_into()
            .map_err(|_| MeshLinkError::ParseError(format!("transform must have exactly 16 values, got {}", values.len())))?;
        Ok(MeshLinkTransform { xid, aref, matrix })
    }

    /// A column-major 4x4 `glam::DMat4` view of this transform's matrix,
    /// for callers that want to compose or invert it.
    pub fn as_mat4(&self) -> glam::DMat4 {
        glam::DMat4::from_cols_array(&self.matrix)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformStore {
    transforms: HashMap<Xid, MeshLinkTransform>,
    /// `name` is tracked separately from `xid` to enforce the
    /// name-uniqueness invariant without overloading the map key.
    names: HashMap<Xid, String>,
}

impl TransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transform: MeshLinkTransform, name: impl Into<String>) -> Result<()> {
        if self.transforms.contains_key(&transform.xid) {
            return Err(MeshLinkError::Duplicate(format!("transform xid {}", transform.xid)));
        }
        let name = name.into();
        self.names.insert(transform.xid, name);
        self.transforms.insert(transform.xid, transform);
        Ok(())
    }

    pub fn get_by_id(&self, xid: Xid) -> Option<&MeshLinkTransform> {
        self.transforms.get(&xid)
    }

    pub fn name_of(&self, xid: Xid) -> Option<&str> {
        self.names.get(&xid).map(String::as_str)
    }

    pub fn contains(&self, xid: Xid) -> bool {
        self.transforms.contains_key(&xid)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshLinkTransform> {
        self.transforms.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_rejects_wrong_length() {
        assert!(MeshLinkTransform::new(Xid::from(1), AttId::INVALID, &[0.0; 15]).is_err());
        assert!(MeshLinkTransform::new(Xid::from(1), AttId::INVALID, &[0.0; 16]).is_ok());
    }

    #[test]
    fn transform_store_rejects_duplicate_xid() {
        let mut store = TransformStore::new();
        let t = MeshLinkTransform::new(Xid::from(1), AttId::INVALID, &[0.0; 16]).unwrap();
        store.add(t, "x0").unwrap();
        let t2 = MeshLinkTransform::new(Xid::from(1), AttId::INVALID, &[1.0; 16]).unwrap();
        assert!(store.add(t2, "x1").is_err());
    }

    #[test]
    fn linkage_store_rejects_duplicate_name() {
        let mut store = LinkageStore::new();
        store
            .add(MeshElementLinkage::new("l0", "sheet-a", "sheet-b", AttId::INVALID, Xid::INVALID))
            .unwrap();
        assert!(store
            .add(MeshElementLinkage::new("l0", "sheet-c", "sheet-d", AttId::INVALID, Xid::INVALID))
            .is_err());
    }
}
