//! Pointer picking: world rays, CPU ray casting against placed models, and
//! the selection resolver that turns a hit into an atom.

mod caster;
mod ray;
mod resolver;

pub use caster::{MeshRayCaster, RayCaster, RayHit};
pub use ray::Ray;
pub use resolver::{PickOutcome, SelectionResolver};
