use std::collections::BTreeMap;

use super::group::{LoadedModel, SceneGroup};
use super::hierarchy::FragmentId;
use crate::annotation::AtomRecord;
use crate::binding::{BindingTables, FragmentAnnotation};

const NO_EMISSIVE: [f32; 3] = [0.0; 3];

/// Session state shared by the binder, the mode controller and the
/// selection resolver: both scene groups, the live binding tables, the
/// molecule's atom records, the selected atom and the highlighted fragment.
#[derive(Debug, Clone)]
pub struct SceneContext {
    molecule: SceneGroup,
    detail: SceneGroup,
    tables: BindingTables,
    atoms: Vec<AtomRecord>,
    selection: Option<AtomRecord>,
    highlighted: Option<FragmentId>,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self {
            molecule: SceneGroup::new(true),
            detail: SceneGroup::new(false),
            tables: BindingTables::default(),
            atoms: Vec::new(),
            selection: None,
            highlighted: None,
        }
    }
}

impl SceneContext {
    /// The whole-molecule group.
    #[must_use]
    pub fn molecule(&self) -> &SceneGroup {
        &self.molecule
    }

    /// The single-atom detail group.
    #[must_use]
    pub fn detail(&self) -> &SceneGroup {
        &self.detail
    }

    pub(crate) fn molecule_mut(&mut self) -> &mut SceneGroup {
        &mut self.molecule
    }

    pub(crate) fn detail_mut(&mut self) -> &mut SceneGroup {
        &mut self.detail
    }

    /// The group currently drawn.
    #[must_use]
    pub fn visible_group(&self) -> &SceneGroup {
        if self.detail.is_visible() {
            &self.detail
        } else {
            &self.molecule
        }
    }

    /// Mutable access to the group currently drawn.
    pub fn visible_group_mut(&mut self) -> &mut SceneGroup {
        if self.detail.is_visible() {
            &mut self.detail
        } else {
            &mut self.molecule
        }
    }

    /// Live binding tables.
    #[must_use]
    pub fn tables(&self) -> &BindingTables {
        &self.tables
    }

    pub(crate) fn replace_tables(&mut self, tables: BindingTables) {
        self.tables = tables;
    }

    /// Atom records parsed from the molecule bundle, in line order.
    #[must_use]
    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    /// Atoms bound in the live tables, ordered by index.
    #[must_use]
    pub fn atom_list(&self) -> Vec<AtomRecord> {
        self.tables
            .atoms_by_index()
            .into_iter()
            .map(|(_, a)| record_from(a))
            .collect()
    }

    /// Number of bound atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.tables.len()
    }

    /// Bound atoms per element symbol.
    #[must_use]
    pub fn element_counts(&self) -> BTreeMap<String, usize> {
        self.tables.element_counts()
    }

    /// Selected atom.
    #[must_use]
    pub fn selection(&self) -> Option<&AtomRecord> {
        self.selection.as_ref()
    }

    pub(crate) fn set_selection(&mut self, atom: Option<AtomRecord>) {
        self.selection = atom;
    }

    /// Fragment carrying the highlight marker.
    #[must_use]
    pub fn highlighted(&self) -> Option<FragmentId> {
        self.highlighted
    }

    /// Move the highlight marker: the previous fragment goes back to no
    /// emissive, `target` (if any) gets `color`.
    pub(crate) fn highlight(&mut self, target: Option<FragmentId>, color: [f32; 3]) {
        if let Some(previous) = self.highlighted.take() {
            let _ = self.set_emissive(previous, NO_EMISSIVE);
        }
        if let Some(id) = target {
            if self.set_emissive(id, color) {
                self.highlighted = Some(id);
            }
        }
    }

    fn set_emissive(&mut self, id: FragmentId, color: [f32; 3]) -> bool {
        let group = if self.molecule.holds(id.model) {
            &mut self.molecule
        } else if self.detail.holds(id.model) {
            &mut self.detail
        } else {
            return false;
        };
        group
            .model_mut()
            .is_some_and(|m| m.hierarchy.with_fragment_mut(id, |f| f.set_emissive(color)))
    }

    /// Select the atom with `index` from the live tables and highlight its
    /// fragment. Returns the selected atom, or `None` (state untouched)
    /// when no bound atom has that index.
    pub fn select_atom(&mut self, index: u32, color: [f32; 3]) -> Option<AtomRecord> {
        let fragment = self.tables.fragment_for_atom(index)?;
        let atom = record_from(self.tables.annotation(fragment)?);
        self.selection = Some(atom.clone());
        self.highlight(Some(fragment), color);
        Some(atom)
    }

    /// Put a freshly loaded molecule in place of everything else.
    pub(crate) fn install_molecule(
        &mut self,
        model: LoadedModel,
        tables: BindingTables,
        atoms: Vec<AtomRecord>,
    ) {
        self.clear();
        let _ = self.molecule.install(model);
        self.tables = tables;
        self.atoms = atoms;
    }

    /// Discard both groups, the tables, the atom records and selection.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

fn record_from(annotation: &FragmentAnnotation) -> AtomRecord {
    AtomRecord {
        index: annotation.index,
        element: annotation.element.clone(),
        position: annotation.position,
    }
}
