//! Semantic invariant checks against an already-built associativity graph
//! (§8's universal properties). Structural validity is the parser's and
//! `ElementTable`'s job; what's checked here only makes sense once a whole
//! [`MeshAssociativity`] exists: `Mid` uniqueness across every topology
//! container, the geometry-group common-entity rule linking ParamVertex
//! references to their owning face/edge, and cascade completeness (every
//! declared face/edge has its implied model-scope counterpart).

use crate::ids::hash_edge;
use crate::model::MeshAssociativity;
use crate::validation::ValidationReport;
use std::collections::HashMap;

/// Runs every semantic check against `facade` and merges their findings
/// into one report.
pub fn validate_semantic(facade: &MeshAssociativity) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_mid_uniqueness(facade, &mut report);
    check_geometry_group_common_entity(facade, &mut report);
    check_cascade_completeness(facade, &mut report);
    report
}

/// §8: a `Mid` that isn't the sentinel must name at most one element across
/// the whole façade, regardless of which container declares it. The
/// model-scope caches (`edge_points`, `face_edge_points`, `face_edges`)
/// always carry `Mid::INVALID` for their implied members (see
/// `MeshModel::cascade_sheet_face`), so only user-declared elements ever
/// reach this check with a real id.
fn check_mid_uniqueness(facade: &MeshAssociativity, report: &mut ValidationReport) {
    let mut seen: HashMap<i64, String> = HashMap::new();
    let mut note = |context: String, mid: crate::ids::Mid, report: &mut ValidationReport| {
        if !mid.is_valid() {
            return;
        }
        let raw = mid.0;
        if let Some(first) = seen.get(&raw) {
            report.add_error(
                context.clone(),
                format!("mid {raw} already used by '{first}'"),
            );
        } else {
            seen.insert(raw, context);
        }
    };

    for model in facade.models().iter_in_order() {
        note(format!("MeshModel '{}'", model.name()), model.common.mid, report);
        for sheet in model.sheets().iter_in_order() {
            note(format!("MeshSheet '{}'", sheet.name()), sheet.common.mid, report);
            for face in sheet.faces().iter_in_order() {
                note(format!("MeshFace '{}'", face.common.name), face.common.mid, report);
            }
        }
        for string in model.strings().iter_in_order() {
            note(format!("MeshString '{}'", string.name()), string.common.mid, report);
            for edge in string.edges().iter_in_order() {
                note(format!("MeshEdge '{}'", edge.common.name), edge.common.mid, report);
            }
        }
        for point in model.points().iter_in_order() {
            note(format!("MeshPoint '{}'", point.common.name), point.common.mid, report);
        }
    }
}

/// §8 property 5: a ParamVertex attached to a face or edge must resolve to
/// the same geometry as the element it's attached to — either it names the
/// element's own `gref` directly, or the two groups' resolved entity sets
/// intersect (the "common entity" rule for composite geometry groups).
fn check_geometry_group_common_entity(facade: &MeshAssociativity, report: &mut ValidationReport) {
    for model in facade.models().iter_in_order() {
        for sheet in model.sheets().iter_in_order() {
            let sheet_gref = sheet.common.gref;
            for face in sheet.faces().iter_in_order() {
                for pv in face.param_vertices.iter().flatten() {
                    check_pv(facade, &format!("MeshFace '{}'", face.common.name), sheet_gref, pv.gref, report);
                }
            }
        }
        for string in model.strings().iter_in_order() {
            let string_gref = string.common.gref;
            for edge in string.edges().iter_in_order() {
                for pv in edge.param_vertices.iter().flatten() {
                    check_pv(facade, &format!("MeshEdge '{}'", edge.common.name), string_gref, pv.gref, report);
                }
            }
        }
    }
}

fn check_pv(
    facade: &MeshAssociativity,
    context: &str,
    owner_gref: crate::ids::Gid,
    pv_gref: crate::ids::Gid,
    report: &mut ValidationReport,
) {
    if !pv_gref.is_valid() || !owner_gref.is_valid() || pv_gref == owner_gref {
        return;
    }
    let owner_entities = facade.geometry().entities(owner_gref);
    let pv_entities = facade.geometry().entities(pv_gref);
    if owner_entities.is_disjoint(pv_entities) {
        report.add_error(
            context.to_string(),
            format!(
                "ParamVertex geometry group {pv_gref:?} shares no entity with owning element's group {owner_gref:?}"
            ),
        );
    }
}

/// §8 property 6: every declared sheet face's bounding edges must appear in
/// the owning model's `face_edges` cache, and every declared string edge's
/// endpoints must appear in its `edge_points` cache. A face/edge missing
/// from its model's implied cache means the insertion path that's supposed
/// to cascade it was bypassed.
fn check_cascade_completeness(facade: &MeshAssociativity, report: &mut ValidationReport) {
    for model in facade.models().iter_in_order() {
        for sheet in model.sheets().iter_in_order() {
            for face in sheet.faces().iter_in_order() {
                let Some(bounding) = face.bounding_edges() else {
                    continue;
                };
                for (i1, i2) in bounding {
                    if model.face_edges().get_by_hash(hash_edge(i1, i2)).is_none() {
                        report.add_error(
                            format!("MeshFace '{}'", face.common.name),
                            format!("bounding edge ({i1}, {i2}) missing from model face-edge cache"),
                        );
                    }
                }
            }
        }
        for string in model.strings().iter_in_order() {
            for edge in string.edges().iter_in_order() {
                let Some((i1, i2)) = edge.indices() else {
                    continue;
                };
                for i in [i1, i2] {
                    if model.edge_points().get_by_hash(crate::ids::hash_point(i)).is_none() {
                        report.add_error(
                            format!("MeshEdge '{}'", edge.common.name),
                            format!("endpoint index {i} missing from model edge-point cache"),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AttId, Gid, Mid};
    use crate::model::{MeshModel, MeshSheet, MeshString};
    use crate::name_gen::NameGenerator;

    fn facade_with_one_triangle() -> MeshAssociativity {
        let mut facade = MeshAssociativity::new();
        let mut model = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "m0", 0);
        model.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
        let mut gen = NameGenerator::new();
        model
            .add_sheet_tri_by_index("sh0", "f0", (1, 2, 3), Mid::from(1), AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        facade.add_model(model).unwrap();
        facade
    }

    #[test]
    fn clean_facade_has_no_findings() {
        let facade = facade_with_one_triangle();
        let report = validate_semantic(&facade);
        assert!(!report.has_errors(), "{:?}", report.items);
    }

    #[test]
    fn duplicate_mid_across_elements_is_flagged() {
        let mut facade = MeshAssociativity::new();
        let mut model = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "m0", 0);
        model.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
        model.add_string(MeshString::new(Mid::from(5), AttId::INVALID, Gid::INVALID, "s0", 0)).unwrap();
        let mut gen = NameGenerator::new();
        model
            .add_sheet_tri_by_index("sh0", "f0", (1, 2, 3), Mid::from(5), AttId::INVALID, Gid::INVALID, &mut gen)
            .unwrap();
        facade.add_model(model).unwrap();

        let report = validate_semantic(&facade);
        assert!(report.has_errors());
        assert!(report.items.iter().any(|i| i.message.contains("mid 5 already used")));
    }

    #[test]
    fn string_endpoints_register_as_edge_points() {
        let mut facade = MeshAssociativity::new();
        let mut model = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "m0", 0);
        model.add_string(MeshString::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "str0", 0)).unwrap();
        model
            .add_string_edge_by_index("str0", "e0", 1, 2, Mid::INVALID, AttId::INVALID, Gid::INVALID)
            .unwrap();
        facade.add_model(model).unwrap();

        let report = validate_semantic(&facade);
        assert!(!report.has_errors(), "{:?}", report.items);
    }
}
