//! Binding of atom annotations to geometry fragments.
//!
//! Fragments are matched by name (`atom_<element>_<index>`), falling back to
//! the parent group's name for unnamed fragments. A match whose index has an
//! [`AtomRecord`] gets a [`FragmentAnnotation`]; everything else (bonds,
//! helper shapes) stays unannotated without complaint.

mod tables;

use glam::Vec3;
use rustc_hash::FxHashMap;

pub use tables::BindingTables;

use crate::annotation::AtomRecord;
use crate::scene::{FragmentId, ModelHierarchy, ModelId};

/// What an annotated fragment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// A single atom.
    Atom,
}

/// Domain data attached to a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentAnnotation {
    /// Annotation kind.
    pub kind: AnnotationKind,
    /// Element symbol taken from the fragment name.
    pub element: String,
    /// Atom index.
    pub index: u32,
    /// Atom position copied from the atom record.
    pub position: Vec3,
}

/// Split `atom_<element>_<index>` into its element and index.
///
/// The element is one or more word characters (it may itself contain `_`);
/// the index is the run of digits after the last underscore.
#[must_use]
pub fn parse_fragment_name(name: &str) -> Option<(&str, u32)> {
    let rest = name.strip_prefix("atom_")?;
    let (element, index) = rest.rsplit_once('_')?;
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    if element.is_empty() || !element.chars().all(is_word) {
        return None;
    }
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((element, index.parse().ok()?))
}

/// Assign handles to every fragment of `model` and attach atom annotations.
///
/// Every leaf fragment receives a [`FragmentId`] under `model_id`, whether
/// or not it binds. When several records share an index the first one in
/// parse order wins; when several fragments name the same atom the first
/// fragment in traversal order keeps the binding.
pub fn bind_atoms(
    model: &mut ModelHierarchy,
    model_id: ModelId,
    atoms: &[AtomRecord],
) -> BindingTables {
    let mut by_index: FxHashMap<u32, &AtomRecord> = FxHashMap::default();
    for atom in atoms {
        let _ = by_index.entry(atom.index).or_insert(atom);
    }

    let mut tables = BindingTables::default();
    let mut slot = 0u32;
    model.root_mut().visit_fragments_mut(&mut |parent, fragment| {
        let id = FragmentId {
            model: model_id,
            slot,
        };
        slot += 1;
        fragment.assign_id(id);

        let group_name = if fragment.name().is_empty() {
            parent
        } else {
            fragment.name()
        };
        let Some((element, index)) = parse_fragment_name(group_name) else {
            return;
        };
        let Some(record) = by_index.get(&index) else {
            log::debug!("fragment {group_name} names atom {index} with no annotation");
            return;
        };
        if tables.fragment_for_atom(index).is_some() {
            log::debug!("atom {index} already bound, leaving {group_name} unannotated");
            return;
        }

        let annotation = FragmentAnnotation {
            kind: AnnotationKind::Atom,
            element: element.to_owned(),
            index,
            position: record.position,
        };
        tables.insert(id, annotation.clone());
        fragment.attach_annotation(annotation);
    });

    log::debug!(
        "bound {} of {} fragments to {} atom records",
        tables.len(),
        slot,
        atoms.len()
    );
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::parse_atom_annotations;
    use crate::asset::{parse_obj, MaterialLibrary};

    fn model(obj: &str) -> ModelHierarchy {
        ModelHierarchy::new(parse_obj(obj).unwrap(), MaterialLibrary::default())
    }

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    #[test]
    fn name_grammar() {
        assert_eq!(parse_fragment_name("atom_H_3"), Some(("H", 3)));
        assert_eq!(parse_fragment_name("atom_Cl_12"), Some(("Cl", 12)));
        assert_eq!(parse_fragment_name("atom_C_a_1"), Some(("C_a", 1)));
        assert_eq!(parse_fragment_name("bond_1_2"), None);
        assert_eq!(parse_fragment_name("atom__3"), None);
        assert_eq!(parse_fragment_name("atom_H_"), None);
        assert_eq!(parse_fragment_name("atom_H_x"), None);
        assert_eq!(parse_fragment_name("atom_H-1_3"), None);
    }

    #[test]
    fn binds_matching_fragment_and_skips_bonds() {
        let obj = format!("{TRI}o molecule\ng atom_H_3\nf 1 2 3\ng bond_1_2\nf 1 2 3\n");
        let mut m = model(&obj);
        let atoms = parse_atom_annotations("# ATOM_3: H 0.5 -1.0 2.0\n");
        let tables = bind_atoms(&mut m, ModelId(1), &atoms);

        assert_eq!(tables.len(), 1);
        let frags = m.fragments();
        let atom = frags[0].annotation().unwrap();
        assert_eq!(atom.index, 3);
        assert_eq!(atom.element, "H");
        assert_eq!(atom.position, Vec3::new(0.5, -1.0, 2.0));
        assert_eq!(tables.annotation(frags[0].id().unwrap()), Some(atom));

        assert!(frags[1].annotation().is_none());
        assert!(tables.annotation(frags[1].id().unwrap()).is_none());
        assert_eq!(frags[1].id().unwrap().slot, 1);
    }

    #[test]
    fn unnamed_fragment_falls_back_to_parent_name() {
        let obj = format!("{TRI}o atom_O_0\nf 1 2 3\n");
        let mut m = model(&obj);
        let atoms = parse_atom_annotations("# ATOM_0: O 0 0 0\n");
        let tables = bind_atoms(&mut m, ModelId(2), &atoms);
        assert_eq!(tables.len(), 1);
        assert_eq!(m.fragments()[0].annotation().unwrap().element, "O");
    }

    #[test]
    fn element_comes_from_geometry_name() {
        let obj = format!("{TRI}g atom_N_1\nf 1 2 3\n");
        let mut m = model(&obj);
        let atoms = parse_atom_annotations("# ATOM_1: C 0 0 0\n");
        let _ = bind_atoms(&mut m, ModelId(3), &atoms);
        assert_eq!(m.fragments()[0].annotation().unwrap().element, "N");
    }

    #[test]
    fn missing_record_leaves_fragment_unannotated() {
        let obj = format!("{TRI}g atom_H_9\nf 1 2 3\n");
        let mut m = model(&obj);
        let tables = bind_atoms(&mut m, ModelId(4), &[]);
        assert!(tables.is_empty());
        assert!(m.fragments()[0].annotation().is_none());
        assert!(m.fragments()[0].id().is_some());
    }

    #[test]
    fn duplicate_records_and_fragments_use_first() {
        let obj = format!("{TRI}g atom_H_1\nf 1 2 3\ng atom_H_1\nf 1 2 3\n");
        let mut m = model(&obj);
        let atoms = parse_atom_annotations("# ATOM_1: H 1 1 1\n# ATOM_1: H 2 2 2\n");
        let tables = bind_atoms(&mut m, ModelId(5), &atoms);
        assert_eq!(tables.len(), 1);
        let frags = m.fragments();
        assert_eq!(frags[0].annotation().unwrap().position, Vec3::ONE);
        assert!(frags[1].annotation().is_none());
        assert_eq!(tables.fragment_for_atom(1), frags[0].id());
    }
}
