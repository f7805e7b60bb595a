use glam::Vec3;

/// Non-indexed triangle soup: every three consecutive vertices form one
/// triangle, and `normals[i]` belongs to `positions[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshGeometry {
    /// Vertex positions in model space.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`.
    pub normals: Vec<Vec3>,
}

impl MeshGeometry {
    /// Build a mesh from parallel position/normal buffers.
    ///
    /// Returns `None` when the buffers differ in length or do not describe
    /// whole triangles.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>) -> Option<Self> {
        if positions.len() != normals.len() || positions.len() % 3 != 0 {
            return None;
        }
        Some(Self { positions, normals })
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set, `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        ))
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent across the three axes.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}
