//! Geometry files and geometry groups.
//!
//! `GeometryGroup` and `GeometryReference` share one record type: a leaf
//! group (parsed from a `GeometryReference`) carries an explicit entity-name
//! set directly; a composite group (parsed from a root-level
//! `GeometryGroup`) carries child group ids and has its entity-name set
//! populated by unioning the children at insert time.

use crate::error::{MeshLinkError, Result};
use crate::ids::{AttId, Gid};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A `GeometryFile` element: the file a set of leaf `GeometryGroup`s were
/// declared inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFile {
    pub filename: String,
    pub aref: Option<AttId>,
    /// Ids of the leaf groups declared as `GeometryReference` children of
    /// this file element.
    pub group_ids: Vec<Gid>,
}

/// A `GeometryGroup` or `GeometryReference` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryGroup {
    pub gid: Gid,
    pub name: Option<String>,
    pub aref: Option<AttId>,
    /// The containing composite group's id, if this group was unioned into
    /// one.
    pub group_id: Option<Gid>,
    /// Child group ids; empty for a leaf `GeometryReference`.
    pub child_group_ids: Vec<Gid>,
    /// The flat set of geometric entity names this group resolves to:
    /// populated directly for a leaf, unioned from children for a
    /// composite.
    pub entity_names: HashSet<String>,
}

impl GeometryGroup {
    pub fn leaf(gid: Gid, name: Option<String>, aref: Option<AttId>, entity_names: HashSet<String>) -> Self {
        GeometryGroup {
            gid,
            name,
            aref,
            group_id: None,
            child_group_ids: Vec::new(),
            entity_names,
        }
    }

    pub fn composite(gid: Gid, name: Option<String>, aref: Option<AttId>, child_group_ids: Vec<Gid>) -> Self {
        GeometryGroup {
            gid,
            name,
            aref,
            group_id: None,
            child_group_ids,
            entity_names: HashSet::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.child_group_ids.is_empty()
    }
}

/// Store of `GeometryFile`s and `GeometryGroup`s, with id/name lookup and
/// composite-group resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryStore {
    files: Vec<GeometryFile>,
    groups: HashMap<Gid, GeometryGroup>,
    name_index: HashMap<String, Gid>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: GeometryFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[GeometryFile] {
        &self.files
    }

    /// Inserts a leaf group (no children to resolve).
    pub fn add_group(&mut self, group: GeometryGroup) -> Result<()> {
        self.check_new_group(&group)?;
        self.insert_group(group);
        Ok(())
    }

    /// Inserts a composite group: every id in `child_group_ids` must already
    /// exist in the store. The composite's entity-name set is populated by
    /// unioning the children's entity sets, and each child's `group_id`
    /// back-pointer is set to this group's id.
    pub fn add_composite_group(&mut self, mut group: GeometryGroup) -> Result<()> {
        self.check_new_group(&group)?;
        let mut union = HashSet::new();
        for child_gid in &group.child_group_ids {
            let child = self
                .groups
                .get(child_gid)
                .ok_or_else(|| MeshLinkError::UnresolvedReference(format!("GeometryGroup child gid {child_gid}")))?;
            union.extend(child.entity_names.iter().cloned());
        }
        group.entity_names = union;
        let gid = group.gid;
        let child_ids = group.child_group_ids.clone();
        self.insert_group(group);
        for child_gid in child_ids {
            if let Some(child) = self.groups.get_mut(&child_gid) {
                child.group_id = Some(gid);
            }
        }
        Ok(())
    }

    fn check_new_group(&self, group: &GeometryGroup) -> Result<()> {
        if self.groups.contains_key(&group.gid) {
            return Err(MeshLinkError::Duplicate(format!("GeometryGroup with gid {}", group.gid)));
        }
        if let Some(name) = &group.name {
            if !name.is_empty() && self.name_index.contains_key(name) {
                return Err(MeshLinkError::Duplicate(format!("GeometryGroup with name '{name}'")));
            }
        }
        Ok(())
    }

    fn insert_group(&mut self, group: GeometryGroup) {
        if let Some(name) = group.name.clone() {
            if !name.is_empty() {
                self.name_index.insert(name, group.gid);
            }
        }
        self.groups.insert(group.gid, group);
    }

    pub fn get_by_id(&self, gid: Gid) -> Option<&GeometryGroup> {
        self.groups.get(&gid)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&GeometryGroup> {
        self.name_index.get(name).and_then(|gid| self.groups.get(gid))
    }

    /// Ids of every group in the store, sorted ascending.
    pub fn ids(&self) -> Vec<Gid> {
        let mut ids: Vec<Gid> = self.groups.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn count(&self) -> usize {
        self.groups.len()
    }

    /// Flat set of geometric entity names a group resolves to. Empty if the
    /// group doesn't exist.
    pub fn entities(&self, gid: Gid) -> &HashSet<String> {
        static EMPTY: std::sync::OnceLock<HashSet<String>> = std::sync::OnceLock::new();
        self.groups
            .get(&gid)
            .map(|g| &g.entity_names)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn leaf_group_stores_entity_names_directly() {
        let mut store = GeometryStore::new();
        store
            .add_group(GeometryGroup::leaf(Gid(1), None, None, entities(&["face_a"])))
            .unwrap();
        assert_eq!(store.entities(Gid(1)), &entities(&["face_a"]));
    }

    #[test]
    fn composite_group_unions_children_and_sets_back_pointer() {
        let mut store = GeometryStore::new();
        store
            .add_group(GeometryGroup::leaf(Gid(1), None, None, entities(&["a"])))
            .unwrap();
        store
            .add_group(GeometryGroup::leaf(Gid(2), None, None, entities(&["b"])))
            .unwrap();
        store
            .add_composite_group(GeometryGroup::composite(Gid(10), None, None, vec![Gid(1), Gid(2)]))
            .unwrap();
        assert_eq!(store.entities(Gid(10)), &entities(&["a", "b"]));
        assert_eq!(store.get_by_id(Gid(1)).unwrap().group_id, Some(Gid(10)));
        assert_eq!(store.get_by_id(Gid(2)).unwrap().group_id, Some(Gid(10)));
    }

    #[test]
    fn composite_group_with_missing_child_is_rejected() {
        let mut store = GeometryStore::new();
        let result = store.add_composite_group(GeometryGroup::composite(Gid(10), None, None, vec![Gid(99)]));
        assert!(result.is_err());
        assert!(store.get_by_id(Gid(10)).is_none());
    }

    #[test]
    fn duplicate_gid_and_duplicate_name_are_rejected() {
        let mut store = GeometryStore::new();
        store
            .add_group(GeometryGroup::leaf(Gid(1), Some("outer".into()), None, entities(&["a"])))
            .unwrap();
        assert!(store
            .add_group(GeometryGroup::leaf(Gid(1), None, None, HashSet::new()))
            .is_err());
        assert!(store
            .add_group(GeometryGroup::leaf(Gid(2), Some("outer".into()), None, HashSet::new()))
            .is_err());
    }

    #[test]
    fn ids_are_returned_sorted() {
        let mut store = GeometryStore::new();
        for gid in [5, 1, 3] {
            store.add_group(GeometryGroup::leaf(Gid(gid), None, None, HashSet::new())).unwrap();
        }
        assert_eq!(store.ids(), vec![Gid(1), Gid(3), Gid(5)]);
    }
}
