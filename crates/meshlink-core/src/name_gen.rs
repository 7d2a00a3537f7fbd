//! Deterministic name generation for unnamed elements.
//!
//! The original implementation keeps one `static` counter per C++ class
//! (`MeshPoint::nameCounter_`, `MeshEdge::nameCounter_`, ...), process-wide.
//! The design notes call that out as a wart for multi-threaded or
//! multi-document ingestion and recommend scoping the counters to the
//! owning façade instead (see DESIGN.md). `NameGenerator` is that per-kind,
//! per-façade counter set: one field per element kind, each incremented
//! independently, so names stay reproducible given identical insertion
//! order without any process-wide mutable state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Point,
    Edge,
    Face,
    String,
    Sheet,
    Model,
    Linkage,
    Transform,
    Generic,
}

impl ElementKind {
    fn prefix(self) -> &'static str {
        match self {
            ElementKind::Point => "ml_point",
            ElementKind::Edge => "ml_edge",
            ElementKind::Face => "ml_face",
            ElementKind::String => "ml_string",
            ElementKind::Sheet => "ml_sheet",
            ElementKind::Model => "ml_model",
            ElementKind::Linkage => "ml_linkage",
            ElementKind::Transform => "ml_transform",
            ElementKind::Generic => "ml_entity",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameGenerator {
    point: u64,
    edge: u64,
    face: u64,
    string: u64,
    sheet: u64,
    model: u64,
    linkage: u64,
    transform: u64,
    generic: u64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unique name for `kind` and advances its counter.
    pub fn next_name(&mut self, kind: ElementKind) -> String {
        let counter = match kind {
            ElementKind::Point => &mut self.point,
            ElementKind::Edge => &mut self.edge,
            ElementKind::Face => &mut self.face,
            ElementKind::String => &mut self.string,
            ElementKind::Sheet => &mut self.sheet,
            ElementKind::Model => &mut self.model,
            ElementKind::Linkage => &mut self.linkage,
            ElementKind::Transform => &mut self.transform,
            ElementKind::Generic => &mut self.generic,
        };
        let name = format!("{}-{}", kind.prefix(), *counter);
        *counter += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent_per_kind() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.next_name(ElementKind::Edge), "ml_edge-0");
        assert_eq!(gen.next_name(ElementKind::Face), "ml_face-0");
        assert_eq!(gen.next_name(ElementKind::Edge), "ml_edge-1");
    }

    #[test]
    fn names_are_reproducible_given_identical_insertion_order() {
        let mut a = NameGenerator::new();
        let mut b = NameGenerator::new();
        for _ in 0..5 {
            assert_eq!(a.next_name(ElementKind::Point), b.next_name(ElementKind::Point));
        }
    }
}
