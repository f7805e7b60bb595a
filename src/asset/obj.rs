//! Geometry text reader.
//!
//! Supports the subset of Wavefront OBJ the model generator emits plus the
//! common corner forms: `v`, `vn`, `f` (`v`, `v/vt`, `v//vn`, `v/vt/vn`,
//! negative indices), `o`, `g`, `usemtl`. Polygons are fan-triangulated
//! and expanded into non-indexed triangles.

use glam::Vec3;

use crate::error::LoadError;
use crate::geometry::MeshGeometry;
use crate::scene::{Fragment, Node};

#[derive(Default)]
struct FragmentBuilder {
    name: String,
    material: Option<String>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl FragmentBuilder {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    fn build(self) -> Option<Node> {
        if self.positions.is_empty() {
            return None;
        }
        let geometry = MeshGeometry::new(self.positions, self.normals)?;
        Some(Node::Fragment(Fragment::new(
            self.name,
            self.material,
            geometry,
        )))
    }
}

struct ObjectBuilder {
    name: String,
    fragments: Vec<FragmentBuilder>,
}

impl ObjectBuilder {
    fn build(self) -> Option<Node> {
        let children: Vec<Node> = self
            .fragments
            .into_iter()
            .filter_map(FragmentBuilder::build)
            .collect();
        if children.is_empty() {
            return None;
        }
        Some(Node::Group {
            name: self.name,
            children,
        })
    }
}

#[derive(Default)]
struct ObjReader {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    objects: Vec<ObjectBuilder>,
    line: usize,
}

impl ObjReader {
    fn error(&self, msg: &str) -> LoadError {
        LoadError::AssetLoad(format!("geometry line {}: {msg}", self.line))
    }

    fn start_object(&mut self, name: &str) {
        self.objects.push(ObjectBuilder {
            name: name.to_owned(),
            fragments: Vec::new(),
        });
    }

    fn current_object(&mut self) -> &mut ObjectBuilder {
        if self.objects.is_empty() {
            self.start_object("");
        }
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    fn current_fragment(&mut self) -> &mut FragmentBuilder {
        let object = self.current_object();
        if object.fragments.is_empty() {
            object.fragments.push(FragmentBuilder::default());
        }
        let last = object.fragments.len() - 1;
        &mut object.fragments[last]
    }

    fn parse_vec3(&self, rest: &str) -> Result<Vec3, LoadError> {
        let mut it = rest.split_whitespace().map(str::parse::<f32>);
        let mut next = || {
            it.next()
                .and_then(Result::ok)
                .ok_or_else(|| self.error("expected three numbers"))
        };
        let v = Vec3::new(next()?, next()?, next()?);
        if !v.is_finite() {
            return Err(self.error("non-finite coordinate"));
        }
        Ok(v)
    }

    fn resolve(&self, raw: &str, len: usize, what: &str) -> Result<usize, LoadError> {
        let idx: i64 = raw
            .parse()
            .map_err(|_| self.error(&format!("invalid {what} index {raw:?}")))?;
        let resolved = match idx {
            0 => None,
            i if i > 0 => Some(i as usize - 1),
            i => (len as i64).checked_add(i).and_then(|r| usize::try_from(r).ok()),
        };
        resolved
            .filter(|&r| r < len)
            .ok_or_else(|| self.error(&format!("{what} index {raw} out of range")))
    }

    fn corner(&self, token: &str) -> Result<(Vec3, Option<Vec3>), LoadError> {
        let mut parts = token.split('/');
        let v = parts.next().unwrap_or_default();
        let _texcoord = parts.next();
        let position = self.positions[self.resolve(v, self.positions.len(), "vertex")?];
        let normal = match parts.next() {
            Some(n) if !n.is_empty() => {
                Some(self.normals[self.resolve(n, self.normals.len(), "normal")?])
            }
            _ => None,
        };
        Ok((position, normal))
    }

    fn face(&mut self, rest: &str) -> Result<(), LoadError> {
        let corners = rest
            .split_whitespace()
            .map(|t| self.corner(t))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            return Err(self.error("face needs at least three corners"));
        }

        let fragment = self.current_fragment();
        for i in 1..corners.len() - 1 {
            let tri = [corners[0], corners[i], corners[i + 1]];
            let flat = (tri[1].0 - tri[0].0)
                .cross(tri[2].0 - tri[0].0)
                .normalize_or_zero();
            for (position, normal) in tri {
                fragment.positions.push(position);
                fragment.normals.push(normal.unwrap_or(flat));
            }
        }
        Ok(())
    }

    fn use_material(&mut self, name: &str) {
        let fragment = self.current_fragment();
        if fragment.positions.is_empty() {
            fragment.material = Some(name.to_owned());
        } else if fragment.material.as_deref() != Some(name) {
            log::debug!(
                "ignoring usemtl {name} inside fragment {:?} after its first face",
                fragment.name
            );
        }
    }

    fn statement(&mut self, line: &str) -> Result<(), LoadError> {
        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match keyword {
            "v" => {
                let v = self.parse_vec3(rest)?;
                self.positions.push(v);
            }
            "vn" => {
                let n = self.parse_vec3(rest)?;
                self.normals.push(n);
            }
            "f" => self.face(rest)?,
            "o" => self.start_object(rest),
            "g" => self
                .current_object()
                .fragments
                .push(FragmentBuilder::named(rest)),
            "usemtl" => self.use_material(rest),
            _ => {}
        }
        Ok(())
    }
}

/// Parse geometry text into a hierarchy root.
///
/// The root is an unnamed group whose children are the objects (`o`); each
/// object holds its fragments (`g`). Faces outside any `g` land in an
/// unnamed fragment of the current object. Empty fragments and objects are
/// dropped.
///
/// # Errors
///
/// [`LoadError::AssetLoad`] naming the first malformed line or
/// out-of-range index.
pub fn parse_obj(text: &str) -> Result<Node, LoadError> {
    let mut reader = ObjReader::default();
    for (i, raw) in text.lines().enumerate() {
        reader.line = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        reader.statement(line)?;
    }

    let children = reader
        .objects
        .into_iter()
        .filter_map(ObjectBuilder::build)
        .collect();
    Ok(Node::Group {
        name: String::new(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(node: &Node) -> Vec<(String, String, usize)> {
        let mut out = Vec::new();
        node.visit_fragments(&mut |parent, f| {
            out.push((
                parent.to_owned(),
                f.name().to_owned(),
                f.geometry().vertex_count(),
            ));
        });
        out
    }

    #[test]
    fn generator_layout() {
        let text = "# OBJ file for molecule
mtllib model.mtl
o molecule

# ATOM_0: O 0.000 0.000 0.000
g atom_O_0
# ATOM_DATA: O 0
usemtl mat_atom_O_0
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1//1 2//2 3//3

# Bond 0
g bond_0
usemtl bond_material
v 0 0 1
v 1 0 1
v 0 1 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 4//4 5//5 6//6
";
        let root = parse_obj(text).unwrap();
        assert_eq!(
            fragments(&root),
            vec![
                ("molecule".to_owned(), "atom_O_0".to_owned(), 3),
                ("molecule".to_owned(), "bond_0".to_owned(), 3),
            ]
        );
        let mut materials = Vec::new();
        root.visit_fragments(&mut |_, f| materials.push(f.material().map(str::to_owned)));
        assert_eq!(
            materials,
            vec![Some("mat_atom_O_0".to_owned()), Some("bond_material".to_owned())]
        );
    }

    #[test]
    fn quads_fan_and_missing_normals_are_flat() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2/7 3 4\n";
        let root = parse_obj(text).unwrap();
        let mut geometry = None;
        root.visit_fragments(&mut |_, f| geometry = Some(f.geometry().clone()));
        let geometry = geometry.unwrap();
        assert_eq!(geometry.triangle_count(), 2);
        assert!(geometry.normals.iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn negative_indices_are_relative() {
        let text = "v 0 0 0\nv 2 0 0\nv 0 2 0\nf -3 -2 -1\n";
        let root = parse_obj(text).unwrap();
        let mut positions = Vec::new();
        root.visit_fragments(&mut |_, f| positions.extend(f.geometry().positions.clone()));
        assert_eq!(positions[1], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn unnamed_fragment_sits_under_object() {
        let root = parse_obj("o atom_H_1\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(
            fragments(&root),
            vec![("atom_H_1".to_owned(), String::new(), 3)]
        );
    }

    #[test]
    fn empty_groups_are_dropped() {
        let root = parse_obj("o empty\ng nothing\n").unwrap();
        assert!(fragments(&root).is_empty());
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_obj("v 0 0 0\nv 1 zero 0\n").unwrap_err();
        assert!(matches!(&err, LoadError::AssetLoad(m) if m.contains("line 2")));

        let err = parse_obj("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(&err, LoadError::AssetLoad(m) if m.contains("out of range")));

        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(&err, LoadError::AssetLoad(m) if m.contains("three corners")));

        let err = parse_obj("v 0 0 0\nv nan 0 0\n").unwrap_err();
        assert!(matches!(&err, LoadError::AssetLoad(m) if m.contains("line 2") && m.contains("non-finite")));

        let err = parse_obj("v 0 0 0\nv 1 0 0\nvn inf 0 1\n").unwrap_err();
        assert!(matches!(&err, LoadError::AssetLoad(m) if m.contains("line 3") && m.contains("non-finite")));
    }
}
