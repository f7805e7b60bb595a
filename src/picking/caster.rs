use glam::{Mat4, Vec3};

use super::ray::Ray;
use crate::scene::{FragmentId, ModelHierarchy};

/// Nearest surface hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Fragment that was hit.
    pub fragment: FragmentId,
    /// Ray parameter of the hit (world units for a unit-length ray).
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Ray intersection against a placed model.
///
/// The default [`MeshRayCaster`] tests every triangle on the CPU; a
/// renderer with its own acceleration structure can supply another.
pub trait RayCaster {
    /// Nearest hit of world-space `ray` against `model` placed by
    /// `model_to_world`.
    fn cast(&self, ray: Ray, model: &ModelHierarchy, model_to_world: Mat4) -> Option<RayHit>;
}

/// Brute-force triangle caster over the displayed (smoothed) geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRayCaster;

impl RayCaster for MeshRayCaster {
    fn cast(&self, ray: Ray, model: &ModelHierarchy, model_to_world: Mat4) -> Option<RayHit> {
        let local = ray.transformed(model_to_world.inverse());

        let mut nearest: Option<(FragmentId, f32)> = None;
        for fragment in model.fragments() {
            let Some(id) = fragment.id() else {
                continue;
            };
            for tri in fragment.geometry().triangles() {
                if let Some(t) = local.intersect_triangle(tri) {
                    if nearest.is_none_or(|(_, best)| t < best) {
                        nearest = Some((id, t));
                    }
                }
            }
        }

        nearest.map(|(fragment, distance)| RayHit {
            fragment,
            distance,
            point: ray.at(distance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::parse_atom_annotations;
    use crate::asset::{parse_obj, MaterialLibrary};
    use crate::binding::bind_atoms;
    use crate::scene::ModelId;

    fn two_quads() -> ModelHierarchy {
        // near quad at z = 1, far quad at z = -1, both spanning x,y in [-1, 1]
        let obj = "v -1 -1 1\nv 1 -1 1\nv 1 1 1\nv -1 1 1\n\
                   v -1 -1 -1\nv 1 -1 -1\nv 1 1 -1\nv -1 1 -1\n\
                   g far\nf 5 6 7 8\ng near\nf 1 2 3 4\n";
        let mut model = ModelHierarchy::new(parse_obj(obj).unwrap(), MaterialLibrary::default());
        let _ = bind_atoms(&mut model, ModelId(1), &parse_atom_annotations(""));
        model
    }

    #[test]
    fn nearest_fragment_wins() {
        let model = two_quads();
        let ray = Ray::new(Vec3::new(0.2, 0.1, 10.0), Vec3::NEG_Z);
        let hit = MeshRayCaster.cast(ray, &model, Mat4::IDENTITY).unwrap();
        assert_eq!(hit.fragment.slot, 1);
        assert!((hit.distance - 9.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.2, 0.1, 1.0)).length() < 1e-5);
    }

    #[test]
    fn placement_is_honoured() {
        let model = two_quads();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let shifted = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!(MeshRayCaster.cast(ray, &model, shifted).is_none());

        let half = Mat4::from_scale(Vec3::splat(0.5));
        let hit = MeshRayCaster.cast(ray, &model, half).unwrap();
        assert!((hit.distance - 9.5).abs() < 1e-5);
    }

    #[test]
    fn unbound_fragments_are_not_pickable() {
        let model = ModelHierarchy::new(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap(),
            MaterialLibrary::default(),
        );
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::NEG_Z);
        assert!(MeshRayCaster.cast(ray, &model, Mat4::IDENTITY).is_none());
    }
}
