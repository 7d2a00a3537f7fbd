//! Geometry kernel interface (§6.2): the contract the core calls but does
//! not implement.
//!
//! The core never evaluates or projects a point itself — it only carries
//! enough to ask a pluggable kernel to do so on demand. A façade holds a
//! [`KernelRegistry`] of named kernels with at most one active at a time;
//! callers outside the core attach an implementation post-load and query
//! it through the façade (§2 "Control flow").
//!
//! This registry is scoped per façade rather than process-wide, adopting
//! the re-architecture §9's design notes recommend over the original's
//! static singleton.

use crate::error::{MeshLinkError, Result};
use std::collections::HashMap;

/// Whether a named entity is a curve, a surface, or unrecognized by the
/// active kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Curve,
    Surface,
    Unknown,
}

/// Whether a surface's evaluated normal agrees with the owning mesh
/// face's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Same,
    Opposite,
}

/// Result of [`GeometryKernel::project_point`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub xyz: [f64; 3],
    pub uv: (f64, f64),
    pub distance: f64,
    pub tolerance: f64,
    /// Name of the curve or surface entity the point projected onto.
    pub entity_name: String,
}

/// Result of [`GeometryKernel::eval_curvature_on_curve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCurvature {
    pub xyz: [f64; 3],
    pub tangent: [f64; 3],
    pub principal_normal: [f64; 3],
    pub binormal: [f64; 3],
    pub curvature: f64,
    pub is_linear: bool,
}

/// Result of [`GeometryKernel::eval_derivatives_on_curve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDerivatives {
    pub xyz: [f64; 3],
    pub d_du: [f64; 3],
    pub d2_du2: [f64; 3],
}

/// Result of [`GeometryKernel::eval_curvature_on_surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCurvature {
    pub xyz: [f64; 3],
    pub dx_du: [f64; 3],
    pub dx_dv: [f64; 3],
    pub d2x_du2: [f64; 3],
    pub d2x_dudv: [f64; 3],
    pub d2x_dv2: [f64; 3],
    pub normal: [f64; 3],
    pub principal_v: [f64; 3],
    pub min_k: f64,
    pub max_k: f64,
    pub avg_k: f64,
    pub gauss_k: f64,
    pub orientation: Orientation,
}

/// The abstract contract a geometry kernel implementation provides to the
/// core (§6.2). The core is purely a consumer: it never implements point
/// projection, curve/surface evaluation, curvature, or model tolerances
/// itself.
pub trait GeometryKernel {
    fn name(&self) -> &str;

    /// Loads the kernel's backing geometry file. Returns `false` (not an
    /// error) when the kernel understands the request but the load
    /// itself did not succeed, mirroring the original's boolean-return
    /// convention; a hard kernel fault should be surfaced as `Err`
    /// instead.
    fn read(&mut self, filename: &str) -> Result<bool>;

    fn project_point(&self, group: &str, xyz: [f64; 3]) -> Result<Projection>;
    fn eval_xyz(&self, uv: (f64, f64), entity_name: &str) -> Result<[f64; 3]>;
    fn eval_radius_of_curvature(&self, uv: (f64, f64), entity_name: &str) -> Result<(f64, f64)>;
    fn eval_curvature_on_curve(&self, uv: (f64, f64), entity_name: &str) -> Result<CurveCurvature>;
    fn eval_derivatives_on_curve(&self, uv: (f64, f64), entity_name: &str) -> Result<CurveDerivatives>;
    fn eval_curvature_on_surface(&self, uv: (f64, f64), entity_name: &str) -> Result<SurfaceCurvature>;
    fn eval_surface_tolerance(&self, entity_name: &str) -> Result<(f64, f64)>;

    fn entity_type(&self, name: &str) -> EntityType;
    fn entity_exists(&self, name: &str) -> bool;

    fn set_model_size(&mut self, size: f64);
    fn get_model_size(&self) -> f64;
}

/// A façade-owned collection of named kernels with at most one active at
/// a time. Addition, removal, lookup by name, and activation by name are
/// the only operations §6.2 calls for.
#[derive(Default)]
pub struct KernelRegistry {
    kernels: HashMap<String, Box<dyn GeometryKernel>>,
    active: Option<String>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kernel: Box<dyn GeometryKernel>) -> Result<()> {
        let name = kernel.name().to_string();
        if self.kernels.contains_key(&name) {
            return Err(MeshLinkError::Duplicate(format!("geometry kernel '{name}'")));
        }
        self.kernels.insert(name, kernel);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn GeometryKernel>> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.kernels.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn GeometryKernel> {
        self.kernels.get(name).map(|k| k.as_ref())
    }

    /// Makes `name` the active kernel. `KernelError` if no kernel with
    /// that name is registered.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        if !self.kernels.contains_key(name) {
            return Err(MeshLinkError::KernelError(format!("no kernel registered under '{name}'")));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active(&self) -> Option<&dyn GeometryKernel> {
        self.active.as_ref().and_then(|name| self.get(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn GeometryKernel + 'static)> {
        let name = self.active.clone()?;
        self.kernels.get_mut(&name).map(|k| k.as_mut())
    }

    /// The active kernel, or `KernelError` if none is active — the error
    /// every evaluation/projection caller surfaces per §7.
    pub fn require_active(&self) -> Result<&dyn GeometryKernel> {
        self.active().ok_or_else(|| MeshLinkError::KernelError("no active geometry kernel".into()))
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubKernel {
        name: String,
        size: f64,
    }

    impl GeometryKernel for StubKernel {
        fn name(&self) -> &str {
            &self.name
        }
        fn read(&mut self, _filename: &str) -> Result<bool> {
            Ok(true)
        }
        fn project_point(&self, group: &str, xyz: [f64; 3]) -> Result<Projection> {
            Ok(Projection { xyz, uv: (0.0, 0.0), distance: 0.0, tolerance: 1e-6, entity_name: group.to_string() })
        }
        fn eval_xyz(&self, _uv: (f64, f64), _entity_name: &str) -> Result<[f64; 3]> {
            Ok([0.0, 0.0, 0.0])
        }
        fn eval_radius_of_curvature(&self, _uv: (f64, f64), _entity_name: &str) -> Result<(f64, f64)> {
            Ok((1.0, 1.0))
        }
        fn eval_curvature_on_curve(&self, _uv: (f64, f64), _entity_name: &str) -> Result<CurveCurvature> {
            Err(MeshLinkError::KernelError("unsupported in stub".into()))
        }
        fn eval_derivatives_on_curve(&self, _uv: (f64, f64), _entity_name: &str) -> Result<CurveDerivatives> {
            Err(MeshLinkError::KernelError("unsupported in stub".into()))
        }
        fn eval_curvature_on_surface(&self, _uv: (f64, f64), _entity_name: &str) -> Result<SurfaceCurvature> {
            Err(MeshLinkError::KernelError("unsupported in stub".into()))
        }
        fn eval_surface_tolerance(&self, _entity_name: &str) -> Result<(f64, f64)> {
            Ok((1e-6, 1e-3))
        }
        fn entity_type(&self, _name: &str) -> EntityType {
            EntityType::Unknown
        }
        fn entity_exists(&self, _name: &str) -> bool {
            false
        }
        fn set_model_size(&mut self, size: f64) {
            self.size = size;
        }
        fn get_model_size(&self) -> f64 {
            self.size
        }
    }

    #[test]
    fn activating_unknown_kernel_is_a_kernel_error() {
        let mut registry = KernelRegistry::new();
        assert!(registry.activate("none").is_err());
    }

    #[test]
    fn require_active_fails_with_no_kernel_registered() {
        let registry = KernelRegistry::new();
        assert!(registry.require_active().is_err());
    }

    #[test]
    fn add_activate_and_query_round_trip() {
        let mut registry = KernelRegistry::new();
        registry.add(Box::new(StubKernel { name: "stub".into(), size: 0.0 })).unwrap();
        registry.activate("stub").unwrap();
        let k = registry.require_active().unwrap();
        assert_eq!(k.name(), "stub");
    }

    #[test]
    fn duplicate_kernel_name_is_rejected() {
        let mut registry = KernelRegistry::new();
        registry.add(Box::new(StubKernel { name: "stub".into(), size: 0.0 })).unwrap();
        assert!(registry.add(Box::new(StubKernel { name: "stub".into(), size: 0.0 })).is_err());
    }

    #[test]
    fn removing_active_kernel_clears_activation() {
        let mut registry = KernelRegistry::new();
        registry.add(Box::new(StubKernel { name: "stub".into(), size: 0.0 })).unwrap();
        registry.activate("stub").unwrap();
        registry.remove("stub");
        assert!(registry.active().is_none());
    }
}
