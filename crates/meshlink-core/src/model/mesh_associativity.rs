//! `MeshAssociativity`: the aggregate-root façade (§4.7) that owns every
//! store below it and resolves the cross-references only it can see
//! (linkage endpoints span every loaded model; attribute/geometry-group
//! references do not need façade involvement since each store resolves
//! its own).

use crate::error::{MeshLinkError, Result};
use crate::ids::AttId;
use crate::kernel::KernelRegistry;
use crate::model::attribute::AttributeStore;
use crate::model::element_table::{ElementTable, InsertOutcome};
use crate::model::geometry::GeometryStore;
use crate::model::linkage::{LinkageStore, MeshElementLinkage, MeshLinkTransform, TransformStore};
use crate::model::mesh_model::MeshModel;
use crate::model::mesh_sheet::MeshSheet;
use crate::model::mesh_string::MeshString;
use crate::name_gen::NameGenerator;

/// A `MeshFile` element: the file a set of `MeshModelReference`s were
/// declared inside.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFileRecord {
    pub filename: String,
    pub aref: Option<AttId>,
    pub model_refs: Vec<String>,
}

/// Namespace/schema strings the parser captures off the document root and
/// the writer must reproduce verbatim (§4.9).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocMeta {
    pub xmlns: Option<String>,
    pub xmlns_xsi: Option<String>,
    pub schema_location: Option<String>,
}

/// Owns every store in the associativity graph: attributes, geometry
/// bindings, transforms, linkages, mesh files, and every loaded
/// `MeshModel`. Also owns the per-façade name-counter set and the
/// per-façade geometry-kernel registry (§9's recommended re-architecture
/// away from process-wide statics).
#[derive(Default)]
pub struct MeshAssociativity {
    attributes: AttributeStore,
    geometry: GeometryStore,
    transforms: TransformStore,
    linkages: LinkageStore,
    mesh_files: Vec<MeshFileRecord>,
    models: ElementTable<MeshModel>,
    name_gen: NameGenerator,
    kernels: KernelRegistry,
    pub xml_meta: XmlDocMeta,
}

impl MeshAssociativity {
    pub fn new() -> Self {
        Self::default()
    }

    // -- stores ------------------------------------------------------

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut GeometryStore {
        &mut self.geometry
    }

    pub fn transforms(&self) -> &TransformStore {
        &self.transforms
    }

    pub fn linkages(&self) -> &LinkageStore {
        &self.linkages
    }

    pub fn name_gen_mut(&mut self) -> &mut NameGenerator {
        &mut self.name_gen
    }

    pub fn kernels(&self) -> &KernelRegistry {
        &self.kernels
    }

    pub fn kernels_mut(&mut self) -> &mut KernelRegistry {
        &mut self.kernels
    }

    // -- mesh files ----------------------------------------------------

    pub fn add_mesh_file(&mut self, file: MeshFileRecord) {
        self.mesh_files.push(file);
    }

    pub fn mesh_files(&self) -> &[MeshFileRecord] {
        &self.mesh_files
    }

    // -- models --------------------------------------------------------

    pub fn add_model(&mut self, model: MeshModel) -> Result<(String, InsertOutcome)> {
        self.models.add(model)
    }

    pub fn models(&self) -> &ElementTable<MeshModel> {
        &self.models
    }

    pub fn model_by_name(&self, name: &str) -> Option<&MeshModel> {
        self.models.get_by_name(name)
    }

    pub fn model_by_name_mut(&mut self, name: &str) -> Option<&mut MeshModel> {
        self.models.get_by_name_mut(name)
    }

    /// Iterates every model in insertion (parse) order.
    pub fn models_in_order(&self) -> impl Iterator<Item = &MeshModel> {
        self.models.iter_in_order()
    }

    /// Cross-file resolver (§4.7): iterates every loaded model in
    /// insertion order and returns the first sheet matching `name`.
    pub fn get_mesh_sheet_by_name(&self, name: &str) -> Option<&MeshSheet> {
        self.models.iter_in_order().find_map(|m| m.sheet_by_name(name))
    }

    /// As [`Self::get_mesh_sheet_by_name`], for strings.
    pub fn get_mesh_string_by_name(&self, name: &str) -> Option<&MeshString> {
        self.models.iter_in_order().find_map(|m| m.string_by_name(name))
    }

    fn entity_ref_exists(&self, r: &str) -> bool {
        self.get_mesh_sheet_by_name(r).is_some() || self.get_mesh_string_by_name(r).is_some()
    }

    // -- transforms / linkages ------------------------------------------

    pub fn add_transform(&mut self, transform: MeshLinkTransform, name: impl Into<String>) -> Result<()> {
        self.transforms.add(transform, name)
    }

    /// Validates `linkage.source_ref`/`target_ref` each resolve to a
    /// `MeshSheet` or `MeshString` somewhere across every loaded model,
    /// and that `linkage.xref`, if set, names a registered transform,
    /// before delegating to the linkage store (§4.6).
    pub fn add_linkage(&mut self, linkage: MeshElementLinkage) -> Result<()> {
        if !self.entity_ref_exists(&linkage.source_ref) {
            return Err(MeshLinkError::UnresolvedReference(format!(
                "mesh element linkage '{}' source_ref '{}' does not resolve to a sheet or string",
                linkage.name, linkage.source_ref
            )));
        }
        if !self.entity_ref_exists(&linkage.target_ref) {
            return Err(MeshLinkError::UnresolvedReference(format!(
                "mesh element linkage '{}' target_ref '{}' does not resolve to a sheet or string",
                linkage.name, linkage.target_ref
            )));
        }
        if linkage.xref.is_valid() && self.transforms.get_by_id(linkage.xref).is_none() {
            return Err(MeshLinkError::UnresolvedReference(format!(
                "mesh element linkage '{}' xref {} does not resolve to a transform",
                linkage.name, linkage.xref
            )));
        }
        self.linkages.add(linkage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AttId, Gid, Mid, Xid};
    use crate::model::mesh_model::MeshModel;
    use crate::model::mesh_sheet::MeshSheet;

    fn facade_with_sheet() -> MeshAssociativity {
        let mut facade = MeshAssociativity::new();
        let mut model = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "/Base/m0", 0);
        model.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh0", 0)).unwrap();
        facade.add_model(model).unwrap();
        facade
    }

    #[test]
    fn cross_file_sheet_resolver_finds_sheet_inside_any_model() {
        let facade = facade_with_sheet();
        assert!(facade.get_mesh_sheet_by_name("sh0").is_some());
        assert!(facade.get_mesh_sheet_by_name("nope").is_none());
    }

    #[test]
    fn linkage_with_unresolvable_source_is_rejected() {
        let mut facade = facade_with_sheet();
        let linkage = MeshElementLinkage::new("l0", "nope", "sh0", AttId::INVALID, Xid::INVALID);
        assert!(facade.add_linkage(linkage).is_err());
    }

    #[test]
    fn linkage_between_two_known_sheets_succeeds() {
        let mut facade = facade_with_sheet();
        let mut model2 = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "/Base/m1", 1);
        model2.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh1", 0)).unwrap();
        facade.add_model(model2).unwrap();

        let linkage = MeshElementLinkage::new("l0", "sh0", "sh1", AttId::INVALID, Xid::INVALID);
        facade.add_linkage(linkage).unwrap();
        assert_eq!(facade.linkages().len(), 1);
    }

    #[test]
    fn linkage_with_unresolvable_xref_is_rejected() {
        let mut facade = facade_with_sheet();
        let mut model2 = MeshModel::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "/Base/m1", 1);
        model2.add_sheet(MeshSheet::new(Mid::INVALID, AttId::INVALID, Gid::INVALID, "sh1", 0)).unwrap();
        facade.add_model(model2).unwrap();

        let linkage = MeshElementLinkage::new("l0", "sh0", "sh1", AttId::INVALID, Xid::from(99));
        assert!(facade.add_linkage(linkage).is_err());
    }
}
