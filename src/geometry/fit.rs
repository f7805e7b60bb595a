use glam::{Mat4, Quat, Vec3};

use super::mesh::Aabb;
use crate::options::SceneOptions;

/// Uniform scale applied to a freshly loaded model so it fits the view.
///
/// Models larger than `max_extent` shrink to exactly `max_extent`; models
/// smaller than `min_extent` are enlarged by `upscale`; everything else is
/// left alone.
#[must_use]
pub fn fit_scale(max_dim: f32, options: &SceneOptions) -> f32 {
    if max_dim > options.fit_max_extent {
        options.fit_max_extent / max_dim
    } else if max_dim < options.fit_min_extent {
        options.fit_upscale
    } else {
        1.0
    }
}

/// Placement of a loaded model in the world: centred on its bounding box,
/// uniformly scaled, then spun about +Y by the idle rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    /// Model-space point moved to the world origin.
    pub center: Vec3,
    /// Uniform scale factor.
    pub scale: f32,
    /// Idle rotation about +Y in radians.
    pub rotation_y: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            scale: 1.0,
            rotation_y: 0.0,
        }
    }
}

impl ModelTransform {
    /// Transform that centres and fits `bounds`.
    #[must_use]
    pub fn fitted(bounds: Option<Aabb>, options: &SceneOptions) -> Self {
        bounds.map_or_else(Self::default, |b| Self {
            center: b.center(),
            scale: fit_scale(b.max_dimension(), options),
            rotation_y: 0.0,
        })
    }

    /// Model-to-world matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            Vec3::ZERO,
        ) * Mat4::from_translation(-self.center)
    }

    /// Advance the idle rotation, wrapping to one turn.
    pub fn rotate(&mut self, radians: f32) {
        self.rotation_y = (self.rotation_y + radians) % std::f32::consts::TAU;
    }
}
