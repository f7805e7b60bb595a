//! CPU-side mesh data: triangle buffers, bounds, fit-to-view placement,
//! and normal smoothing.

mod fit;
mod mesh;
pub mod smoothing;

pub use fit::{fit_scale, ModelTransform};
pub use mesh::{Aabb, MeshGeometry};
pub use smoothing::smooth_normals;
