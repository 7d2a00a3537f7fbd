//! Generic storage for a topology container's points, edges, or faces.
//!
//! Every element is owned by one `by_name` map; `by_hash`, `by_id`, and
//! `by_ref` are non-owning indices into it (mirrors the original
//! implementation's private point/edge/face maps, which the header
//! comments mark "not the owner" of their contents). Re-adding an element
//! whose hash or reference already resolves to a name is exists-ok and
//! returns the existing element rather than inserting a duplicate; adding
//! a different element under a name that's already taken is rejected.

use crate::error::{MeshLinkError, Result};
use crate::ids::{IndexTag, Mid};
use crate::model::element::TopoCommon;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shared surface every element kind (`MeshPoint`/`MeshEdge`/`MeshFace`)
/// exposes to its owning `ElementTable`.
pub trait TopoElement {
    fn common(&self) -> &TopoCommon;
    fn common_mut(&mut self) -> &mut TopoCommon;
    fn hash_key(&self) -> Option<IndexTag>;
    fn ref_key(&self) -> Option<&str>;
}

/// Outcome of an insert: whether the name refers to a brand-new element or
/// one that already existed under a matching hash/reference key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementTable<E> {
    by_name: HashMap<String, E>,
    by_hash: HashMap<IndexTag, String>,
    by_id: HashMap<Mid, String>,
    by_ref: HashMap<String, String>,
    order_counter: u64,
}

impl<E> Default for ElementTable<E> {
    fn default() -> Self {
        ElementTable {
            by_name: HashMap::new(),
            by_hash: HashMap::new(),
            by_id: HashMap::new(),
            by_ref: HashMap::new(),
            order_counter: 0,
        }
    }
}

impl<E: TopoElement> ElementTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_order(&mut self) -> u64 {
        let order = self.order_counter;
        self.order_counter += 1;
        order
    }

    /// Inserts `element`, whose `common().name` must already be assigned by
    /// the caller (typically via a `NameGenerator`) and whose `order` is
    /// still a placeholder: `add` assigns the real insertion order itself.
    ///
    /// If `element`'s hash or reference key already resolves to an
    /// existing name, the insert is a no-op and that element's name is
    /// returned with `InsertOutcome::AlreadyExists`. Otherwise, a name
    /// collision with a differently-keyed existing element is rejected.
    pub fn add(&mut self, mut element: E) -> Result<(String, InsertOutcome)> {
        if let Some(hash) = element.hash_key() {
            if let Some(existing) = self.by_hash.get(&hash) {
                return Ok((existing.clone(), InsertOutcome::AlreadyExists));
            }
        }
        if let Some(r) = element.ref_key() {
            if let Some(existing) = self.by_ref.get(r) {
                return Ok((existing.clone(), InsertOutcome::AlreadyExists));
            }
        }
        let name = element.common().name.clone();
        if name.is_empty() {
            return Err(MeshLinkError::ParseError("element name must not be empty".into()));
        }
        if self.by_name.contains_key(&name) {
            return Err(MeshLinkError::Duplicate(format!("element with name '{name}'")));
        }
        element.common_mut().order = self.next_order();
        if let Some(hash) = element.hash_key() {
            self.by_hash.insert(hash, name.clone());
        }
        if let Some(r) = element.ref_key() {
            self.by_ref.insert(r.to_string(), name.clone());
        }
        let mid = element.common().mid;
        if mid.is_valid() {
            self.by_id.insert(mid, name.clone());
        }
        self.by_name.insert(name.clone(), element);
        Ok((name, InsertOutcome::Inserted))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&E> {
        self.by_name.get(name)
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut E> {
        self.by_name.get_mut(name)
    }

    pub fn get_by_hash(&self, hash: IndexTag) -> Option<&E> {
        self.by_hash.get(&hash).and_then(|name| self.by_name.get(name))
    }

    pub fn get_by_ref(&self, r: &str) -> Option<&E> {
        self.by_ref.get(r).and_then(|name| self.by_name.get(name))
    }

    pub fn get_by_id(&self, mid: Mid) -> Option<&E> {
        self.by_id.get(&mid).and_then(|name| self.by_name.get(name))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Enumerates every element in creation order, the only order the
    /// model guarantees (never sorted by hash or by name).
    pub fn iter_in_order(&self) -> impl Iterator<Item = &E> {
        let mut items: Vec<&E> = self.by_name.values().collect();
        items.sort_by_key(|e| e.common().order);
        items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{hash_point, AttId, Gid};
    use crate::model::element::MeshPoint;

    fn point(name: &str, i1: i64) -> MeshPoint {
        MeshPoint::by_index(
            TopoCommon::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, name.to_string(), 0),
            i1,
            None,
        )
    }

    #[test]
    fn insert_then_lookup_by_name_and_hash() {
        let mut table = ElementTable::new();
        let (name, outcome) = table.add(point("p0", 7)).unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(name, "p0");
        assert!(table.get_by_name("p0").is_some());
        assert!(table.get_by_hash(hash_point(7)).is_some());
    }

    #[test]
    fn re_adding_same_index_is_exists_ok_not_a_duplicate_error() {
        let mut table = ElementTable::new();
        table.add(point("p0", 7)).unwrap();
        let (name, outcome) = table.add(point("p1", 7)).unwrap();
        assert_eq!(outcome, InsertOutcome::AlreadyExists);
        assert_eq!(name, "p0");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn same_name_different_index_is_rejected() {
        let mut table = ElementTable::new();
        table.add(point("p0", 7)).unwrap();
        assert!(table.add(point("p0", 8)).is_err());
    }

    #[test]
    fn iter_in_order_reflects_insertion_sequence() {
        let mut table = ElementTable::new();
        table.add(point("p0", 1)).unwrap();
        table.add(point("p1", 2)).unwrap();
        table.add(point("p2", 3)).unwrap();
        let names: Vec<&str> = table.iter_in_order().map(|p| p.common.name.as_str()).collect();
        assert_eq!(names, vec!["p0", "p1", "p2"]);
    }
}
