use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::options::CameraOptions;
use crate::picking::Ray;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera on +Z looking at the origin, as configured.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, options.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // [0,1] depth range
        let proj = Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// World-space ray through a normalized device coordinate
    /// (`-1..1` on both axes, +Y up).
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.build_matrix().inverse();

        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        // perspective divide
        let origin = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray::new(origin, (far - origin).normalize())
    }
}

/// Convert a pixel position (origin top-left) to normalized device
/// coordinates, y flipped.
#[must_use]
pub fn screen_to_ndc(screen_x: f32, screen_y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (screen_x / width) * 2.0 - 1.0,
        1.0 - (screen_y / height) * 2.0,
    )
}
