//! Application-defined attributes and attribute groups.

use crate::error::{MeshLinkError, Result};
use crate::ids::AttId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single `Attribute` or `AttributeGroup` record.
///
/// `contents` is opaque application data for a scalar attribute, or a
/// whitespace-separated list of `AttId`s when `is_group` is set. The core
/// never interprets scalar contents; it only resolves group contents into
/// flat `AttId` lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attid: AttId,
    pub name: Option<String>,
    pub contents: String,
    pub is_group: bool,
}

impl Attribute {
    pub fn scalar(attid: AttId, name: Option<String>, contents: impl Into<String>) -> Self {
        Attribute {
            attid,
            name,
            contents: contents.into(),
            is_group: false,
        }
    }

    pub fn group(attid: AttId, name: Option<String>, contents: impl Into<String>) -> Self {
        Attribute {
            attid,
            name,
            contents: contents.into(),
            is_group: true,
        }
    }

    fn group_members(&self) -> Result<Vec<AttId>> {
        self.contents
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>()
                    .map(AttId)
                    .map_err(|_| MeshLinkError::ParseError(format!("invalid AttId token '{tok}' in attribute group")))
            })
            .collect()
    }
}

/// Holds every `Attribute`/`AttributeGroup` known to a façade and resolves
/// group references into flat, de-duplicated, sorted `AttId` lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeStore {
    attributes: HashMap<AttId, Attribute>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `att`. Rejects a duplicate `attid`. A group's contents are
    /// resolved eagerly so an invalid group is never stored.
    pub fn add(&mut self, att: Attribute) -> Result<()> {
        if self.attributes.contains_key(&att.attid) {
            return Err(MeshLinkError::Duplicate(format!("Attribute with attid {}", att.attid)));
        }
        if att.is_group {
            // Validate that every referenced member resolves, without yet
            // inserting `att` itself (so a failed group never ends up half
            // stored).
            self.resolve_members(&att, &mut HashSet::new())?;
        }
        self.attributes.insert(att.attid, att);
        Ok(())
    }

    pub fn get_by_id(&self, attid: AttId) -> Option<&Attribute> {
        self.attributes.get(&attid)
    }

    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Every stored attribute/attribute-group, in arbitrary order. Callers
    /// that need a deterministic order (the writer) sort by `attid`
    /// themselves.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Resolves `attid` to a flat, de-duplicated, sorted list of concrete
    /// (non-group) `AttId`s. A scalar attribute resolves to `[attid]`.
    pub fn resolve_group(&self, attid: AttId) -> Result<Vec<AttId>> {
        let att = self
            .attributes
            .get(&attid)
            .ok_or_else(|| MeshLinkError::UnresolvedReference(format!("AttId {attid}")))?;
        if !att.is_group {
            return Ok(vec![attid]);
        }
        let mut seen = HashSet::new();
        self.resolve_members(att, &mut seen)?;
        let mut out: Vec<AttId> = seen.into_iter().collect();
        out.sort();
        Ok(out)
    }

    /// Recursively expands `att`'s members into `seen`, skipping group ids
    /// themselves (only concrete scalar ids end up in the closure) and
    /// guarding against a group that references itself.
    fn resolve_members(&self, att: &Attribute, seen: &mut HashSet<AttId>) -> Result<()> {
        for member in att.group_members()? {
            if seen.contains(&member) {
                continue;
            }
            let member_att = self
                .attributes
                .get(&member)
                .ok_or_else(|| MeshLinkError::UnresolvedReference(format!("AttId {member} in group {}", att.attid)))?;
            if member_att.is_group {
                seen.insert(member);
                self.resolve_members(member_att, seen)?;
                seen.remove(&member);
            } else {
                seen.insert(member);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_resolves_to_itself() {
        let mut store = AttributeStore::new();
        store.add(Attribute::scalar(AttId(1), None, "hello")).unwrap();
        assert_eq!(store.resolve_group(AttId(1)).unwrap(), vec![AttId(1)]);
    }

    #[test]
    fn group_resolves_to_flat_sorted_deduplicated_set() {
        let mut store = AttributeStore::new();
        store.add(Attribute::scalar(AttId(1), None, "a")).unwrap();
        store.add(Attribute::scalar(AttId(2), None, "b")).unwrap();
        store.add(Attribute::scalar(AttId(3), None, "c")).unwrap();
        store.add(Attribute::group(AttId(10), None, "2 1 2")).unwrap();
        assert_eq!(store.resolve_group(AttId(10)).unwrap(), vec![AttId(1), AttId(2)]);
    }

    #[test]
    fn nested_group_flattens_and_excludes_group_ids() {
        let mut store = AttributeStore::new();
        store.add(Attribute::scalar(AttId(1), None, "a")).unwrap();
        store.add(Attribute::group(AttId(20), None, "1")).unwrap();
        store.add(Attribute::group(AttId(30), None, "20 1")).unwrap();
        let resolved = store.resolve_group(AttId(30)).unwrap();
        assert_eq!(resolved, vec![AttId(1)]);
    }

    #[test]
    fn group_with_unknown_member_is_rejected_at_insert() {
        let mut store = AttributeStore::new();
        let result = store.add(Attribute::group(AttId(10), None, "999"));
        assert!(result.is_err());
        assert!(store.get_by_id(AttId(10)).is_none());
    }

    #[test]
    fn duplicate_attid_is_rejected() {
        let mut store = AttributeStore::new();
        store.add(Attribute::scalar(AttId(1), None, "a")).unwrap();
        assert!(store.add(Attribute::scalar(AttId(1), None, "b")).is_err());
    }

    #[test]
    fn resolve_group_is_idempotent_and_group_free() {
        let mut store = AttributeStore::new();
        store.add(Attribute::scalar(AttId(1), None, "a")).unwrap();
        store.add(Attribute::scalar(AttId(2), None, "b")).unwrap();
        store.add(Attribute::group(AttId(10), None, "1 2")).unwrap();
        let once = store.resolve_group(AttId(10)).unwrap();
        // Resolving a scalar from the closure again is a fixed point.
        for id in &once {
            assert_eq!(store.resolve_group(*id).unwrap(), vec![*id]);
        }
    }
}
