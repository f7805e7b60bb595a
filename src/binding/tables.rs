use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::FragmentAnnotation;
use crate::scene::FragmentId;

/// Fragment ↔ atom lookup for the model currently in view.
///
/// Both directions are maps and are kept in step: each atom binds to at
/// most one fragment and each fragment to at most one atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTables {
    by_fragment: FxHashMap<FragmentId, FragmentAnnotation>,
    by_atom: FxHashMap<u32, FragmentId>,
}

impl BindingTables {
    /// Bind `annotation` to `fragment`, replacing any previous binding for
    /// that fragment or for the same atom index.
    pub fn insert(&mut self, fragment: FragmentId, annotation: FragmentAnnotation) {
        let index = annotation.index;
        if let Some(previous) = self.by_atom.insert(index, fragment) {
            if previous != fragment {
                let _ = self.by_fragment.remove(&previous);
            }
        }
        if let Some(replaced) = self.by_fragment.insert(fragment, annotation) {
            if replaced.index != index {
                let _ = self.by_atom.remove(&replaced.index);
            }
        }
    }

    /// Annotation bound to `fragment`.
    #[must_use]
    pub fn annotation(&self, fragment: FragmentId) -> Option<&FragmentAnnotation> {
        self.by_fragment.get(&fragment)
    }

    /// Fragment bound to atom `index`.
    #[must_use]
    pub fn fragment_for_atom(&self, index: u32) -> Option<FragmentId> {
        self.by_atom.get(&index).copied()
    }

    /// Number of bound atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_fragment.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_fragment.is_empty()
    }

    /// Drop every binding.
    pub fn clear(&mut self) {
        self.by_fragment.clear();
        self.by_atom.clear();
    }

    /// Bound annotations ordered by atom index.
    #[must_use]
    pub fn atoms_by_index(&self) -> Vec<(FragmentId, &FragmentAnnotation)> {
        let mut atoms: Vec<_> = self.by_fragment.iter().map(|(id, a)| (*id, a)).collect();
        atoms.sort_by_key(|(_, a)| a.index);
        atoms
    }

    /// Number of bound atoms per element symbol.
    #[must_use]
    pub fn element_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for a in self.by_fragment.values() {
            *counts.entry(a.element.clone()).or_insert(0) += 1;
        }
        counts
    }
}
