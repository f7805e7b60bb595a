//! Per-vertex normal welding.
//!
//! Authored meshes often split vertices along hard edges, so two vertices
//! at the same place carry different normals and the surface shows facet
//! seams. Smoothing groups vertices by quantized position and gives every
//! member of a group the renormalized sum of the group's normals.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::mesh::MeshGeometry;

/// Finest quantization accepted. Beyond this the scaled coordinates of
/// ordinary models stop fitting the key and distinct positions collide.
pub const MAX_NORMAL_PRECISION: u32 = 6;

/// Quantized vertex position used to group coincident vertices.
type PositionKey = [i64; 3];

/// Quantize `p` to `precision` decimal places.
///
/// `f32::round` rounds half away from zero, so `-x` and `x` land on
/// mirrored keys, and `-0.0` and `0.0` share a key.
fn position_key(p: Vec3, scale: f32) -> PositionKey {
    [
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    ]
}

/// Return a copy of `source` whose normals are averaged across coincident
/// vertices. Positions and vertex count are untouched.
///
/// A group whose normals cancel out (zero-length sum) gets zero normals.
/// `precision` is capped at [`MAX_NORMAL_PRECISION`].
#[must_use]
pub fn smooth_normals(source: &MeshGeometry, precision: u32) -> MeshGeometry {
    let scale = 10_f32.powi(precision.min(MAX_NORMAL_PRECISION) as i32);
    let keys: Vec<PositionKey> = source
        .positions
        .iter()
        .map(|&p| position_key(p, scale))
        .collect();

    let mut sums: FxHashMap<PositionKey, Vec3> = FxHashMap::default();
    for (key, &normal) in keys.iter().zip(&source.normals) {
        *sums.entry(*key).or_insert(Vec3::ZERO) += normal;
    }

    let averaged: FxHashMap<PositionKey, Vec3> = sums
        .into_iter()
        .map(|(key, sum)| (key, sum.normalize_or_zero()))
        .collect();

    let normals = keys
        .iter()
        .map(|key| averaged.get(key).copied().unwrap_or(Vec3::ZERO))
        .collect();

    MeshGeometry {
        positions: source.positions.clone(),
        normals,
    }
}
