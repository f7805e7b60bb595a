use glam::{Mat4, Vec3};

const EPSILON: f32 = 1e-7;

/// Half-line used for pointer picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction; not required to be unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction`.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine matrix. The parameter of a hit is
    /// preserved, so distances found in the target space compare directly
    /// with those found in the source space.
    #[must_use]
    pub fn transformed(&self, m: Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }

    /// Möller–Trumbore intersection. Returns the ray parameter of the hit,
    /// front or back face, for `t > 0`.
    #[must_use]
    pub fn intersect_triangle(&self, [a, b, c]: [Vec3; 3]) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv;
        (t > EPSILON).then_some(t)
    }
}
