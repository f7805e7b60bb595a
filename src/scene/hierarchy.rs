//! Loaded model hierarchy: named groups with renderable fragments at the
//! leaves.

use std::sync::Arc;

use crate::asset::MaterialLibrary;
use crate::binding::FragmentAnnotation;
use crate::geometry::{smooth_normals, Aabb, MeshGeometry};

/// Identifier of one loaded model, unique per process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

/// Stable fragment handle: owning model plus the slot the binder assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId {
    /// Model the fragment belongs to.
    pub model: ModelId,
    /// Depth-first leaf position within that model.
    pub slot: u32,
}

/// A single renderable surface piece.
#[derive(Debug, Clone)]
pub struct Fragment {
    name: String,
    id: Option<FragmentId>,
    material: Option<String>,
    pristine: Arc<MeshGeometry>,
    geometry: MeshGeometry,
    annotation: Option<FragmentAnnotation>,
    emissive: [f32; 3],
}

impl Fragment {
    /// Wrap freshly built geometry. The geometry is kept as the pristine
    /// copy every later smoothing pass starts from.
    #[must_use]
    pub fn new(name: String, material: Option<String>, geometry: MeshGeometry) -> Self {
        Self {
            name,
            id: None,
            material,
            pristine: Arc::new(geometry.clone()),
            geometry,
            annotation: None,
            emissive: [0.0; 3],
        }
    }

    /// Fragment name (empty when the source gave none).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle assigned at bind time.
    #[must_use]
    pub fn id(&self) -> Option<FragmentId> {
        self.id
    }

    /// Material name referenced by the geometry.
    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Geometry as displayed (smoothed once smoothing ran).
    #[must_use]
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    /// Geometry exactly as loaded.
    #[must_use]
    pub fn pristine(&self) -> &MeshGeometry {
        &self.pristine
    }

    /// Attached atom data, if the binder matched this fragment.
    #[must_use]
    pub fn annotation(&self) -> Option<&FragmentAnnotation> {
        self.annotation.as_ref()
    }

    /// Emissive highlight color (black when not highlighted).
    #[must_use]
    pub fn emissive(&self) -> [f32; 3] {
        self.emissive
    }

    /// Set the emissive highlight color.
    pub fn set_emissive(&mut self, color: [f32; 3]) {
        self.emissive = color;
    }

    pub(crate) fn assign_id(&mut self, id: FragmentId) {
        self.id = Some(id);
    }

    pub(crate) fn attach_annotation(&mut self, annotation: FragmentAnnotation) {
        self.annotation = Some(annotation);
    }

    /// Recompute displayed normals from the pristine copy.
    pub fn resmooth(&mut self, precision: u32) {
        self.geometry = smooth_normals(&self.pristine, precision);
    }
}

/// Hierarchy node.
#[derive(Debug, Clone)]
pub enum Node {
    /// Named container.
    Group {
        /// Group name (empty when unnamed).
        name: String,
        /// Child nodes in source order.
        children: Vec<Node>,
    },
    /// Renderable leaf.
    Fragment(Fragment),
}

impl Node {
    /// Node name; fragments report their own name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } => name,
            Self::Fragment(f) => f.name(),
        }
    }

    /// Visit every fragment depth-first with its parent group's name.
    pub fn visit_fragments<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a Fragment)) {
        if let Self::Group { name, children } = self {
            for child in children {
                match child {
                    Self::Fragment(frag) => f(name, frag),
                    Self::Group { .. } => child.visit_fragments(f),
                }
            }
        }
    }

    /// Mutable variant of [`visit_fragments`](Self::visit_fragments).
    pub fn visit_fragments_mut(&mut self, f: &mut impl FnMut(&str, &mut Fragment)) {
        if let Self::Group { name, children } = self {
            for child in children.iter_mut() {
                match child {
                    Self::Fragment(frag) => f(name, frag),
                    Self::Group { .. } => child.visit_fragments_mut(f),
                }
            }
        }
    }
}

/// Geometry and materials of one loaded bundle.
#[derive(Debug, Clone)]
pub struct ModelHierarchy {
    root: Node,
    materials: MaterialLibrary,
}

impl ModelHierarchy {
    /// Assemble a hierarchy from its root group and materials.
    #[must_use]
    pub fn new(root: Node, materials: MaterialLibrary) -> Self {
        Self { root, materials }
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Materials referenced by fragments.
    #[must_use]
    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// All fragments, depth-first.
    #[must_use]
    pub fn fragments(&self) -> Vec<&Fragment> {
        let mut out = Vec::new();
        self.root.visit_fragments(&mut |_, f| out.push(f));
        out
    }

    /// Number of fragments.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments().len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragment_count() == 0
    }

    /// Fragment by handle.
    #[must_use]
    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments().into_iter().find(|f| f.id() == Some(id))
    }

    /// Apply `f` to the fragment with handle `id`. Returns whether it was
    /// found.
    pub fn with_fragment_mut(&mut self, id: FragmentId, f: impl FnOnce(&mut Fragment)) -> bool {
        let mut f = Some(f);
        self.root.visit_fragments_mut(&mut |_, frag| {
            if frag.id() == Some(id) {
                if let Some(apply) = f.take() {
                    apply(frag);
                }
            }
        });
        f.is_none()
    }

    /// Model-space bounds over every fragment.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        self.fragments()
            .into_iter()
            .filter_map(|f| f.pristine().bounds())
            .reduce(Aabb::union)
    }

    /// Re-run smoothing on every fragment from its pristine geometry.
    pub fn smooth_all(&mut self, precision: u32) {
        self.root
            .visit_fragments_mut(&mut |_, frag| frag.resmooth(precision));
    }

    /// Swap in new materials. Fragments are reprocessed from their pristine
    /// geometry so earlier smoothing is never compounded.
    pub fn set_materials(&mut self, materials: MaterialLibrary, precision: u32) {
        self.materials = materials;
        self.smooth_all(precision);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn tri(normal: Vec3) -> MeshGeometry {
        MeshGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![normal; 3]).unwrap()
    }

    fn sample() -> ModelHierarchy {
        let root = Node::Group {
            name: String::new(),
            children: vec![Node::Group {
                name: "molecule".into(),
                children: vec![
                    Node::Fragment(Fragment::new("atom_O_0".into(), None, tri(Vec3::Z))),
                    Node::Fragment(Fragment::new(String::new(), None, tri(Vec3::Y))),
                ],
            }],
        };
        ModelHierarchy::new(root, MaterialLibrary::default())
    }

    #[test]
    fn visits_with_parent_name() {
        let model = sample();
        let mut seen = Vec::new();
        model
            .root()
            .visit_fragments(&mut |parent, f| seen.push((parent.to_owned(), f.name().to_owned())));
        assert_eq!(
            seen,
            vec![
                ("molecule".to_owned(), "atom_O_0".to_owned()),
                ("molecule".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn repeated_smoothing_starts_from_pristine() {
        let mut model = sample();
        model.smooth_all(3);
        let first: Vec<MeshGeometry> =
            model.fragments().iter().map(|f| f.geometry().clone()).collect();
        model.set_materials(MaterialLibrary::default(), 3);
        let second: Vec<MeshGeometry> =
            model.fragments().iter().map(|f| f.geometry().clone()).collect();
        assert_eq!(first, second);
        assert_eq!(model.fragments()[0].pristine(), &tri(Vec3::Z));
    }

    #[test]
    fn mutate_fragment_by_id() {
        let mut model = sample();
        let id = FragmentId {
            model: ModelId(7),
            slot: 1,
        };
        model.root_mut().visit_fragments_mut(&mut |_, f| {
            if f.name().is_empty() {
                f.assign_id(id);
            }
        });
        assert!(model.with_fragment_mut(id, |f| f.set_emissive([1.0; 3])));
        assert_eq!(model.fragment(id).unwrap().emissive(), [1.0; 3]);
        let missing = FragmentId {
            model: ModelId(7),
            slot: 9,
        };
        assert!(!model.with_fragment_mut(missing, |f| f.set_emissive([0.5; 3])));
    }
}
