//! In-memory associativity graph: mesh topology, geometry bindings, and the
//! stores that link them.
//!
//! Leaf-first, matching §2 of the design: identifiers and hashing
//! ([`crate::ids`]) underpin the attribute store ([`attribute`]), the
//! geometry-binding store ([`geometry`]), per-topology ParamVertex tables
//! ([`param_vertex`]), the generic element index ([`element`],
//! [`element_table`]), the topology containers ([`mesh_string`],
//! [`mesh_sheet`], [`mesh_model`]), the element-linkage/transform store
//! ([`linkage`]), and finally the [`mesh_associativity::MeshAssociativity`]
//! façade that owns all of the above.

pub mod attribute;
pub mod element;
pub mod element_table;
pub mod geometry;
pub mod linkage;
pub mod mesh_associativity;
pub mod mesh_model;
pub mod mesh_sheet;
pub mod mesh_string;
pub mod param_vertex;

pub use attribute::{Attribute, AttributeStore};
pub use element::{EdgeKey, FaceKey, FaceShape, MeshEdge, MeshFace, MeshPoint, PointKey, TopoCommon};
pub use element_table::{ElementTable, InsertOutcome, TopoElement};
pub use geometry::{GeometryFile, GeometryGroup, GeometryStore};
pub use linkage::{LinkageStore, MeshElementLinkage, MeshLinkTransform, TransformStore};
pub use mesh_associativity::{MeshAssociativity, MeshFileRecord};
pub use mesh_model::MeshModel;
pub use mesh_sheet::MeshSheet;
pub use mesh_string::MeshString;
pub use param_vertex::{ParamVertex, ParamVertexTable};
