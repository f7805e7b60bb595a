//! Molecule / atom-detail view state machine.
//!
//! Switching to the detail view saves the live binding tables plus a handle
//! to the molecule group, which stays loaded but hidden. Going back restores
//! the tables from that snapshot and shows the molecule again. The snapshot
//! is a single-slot cache: later detail requests reuse it, and only a
//! new-formula reset frees it.

use super::context::SceneContext;
use super::group::LoadedModel;
use super::hierarchy::ModelId;
use crate::annotation::AtomRecord;
use crate::binding::BindingTables;

/// Which group is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    /// The whole molecule. Picking is active.
    #[default]
    Molecule,
    /// A single pre-built atom model. Picking is off.
    AtomDetail,
}

/// Molecule state saved on the way into the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Binding tables as they were in the molecule view.
    pub tables: BindingTables,
    /// The retained molecule model.
    pub molecule: ModelId,
}

/// Owns the [`SceneContext`] and decides which group is visible.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    context: SceneContext,
    mode: SceneMode,
    snapshot: Option<Snapshot>,
}

impl ModeController {
    /// Empty scene in molecule mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Session state.
    #[must_use]
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Mutable session state.
    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Saved molecule state, if a detail view was entered since the last
    /// reset.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Hard reset before loading a new formula: both groups, tables, atoms,
    /// selection and snapshot are dropped.
    pub fn reset_for_new_formula(&mut self) {
        self.context.clear();
        self.snapshot = None;
        self.mode = SceneMode::Molecule;
        log::debug!("scene reset for new formula");
    }

    /// Show a freshly loaded molecule.
    pub fn install_molecule(
        &mut self,
        model: LoadedModel,
        tables: BindingTables,
        atoms: Vec<AtomRecord>,
    ) {
        log::info!(
            "molecule {} ready: {} atoms bound across {} fragments",
            model.source,
            tables.len(),
            model.hierarchy.fragment_count()
        );
        self.context.install_molecule(model, tables, atoms);
        self.snapshot = None;
        self.mode = SceneMode::Molecule;
        self.sync_visibility();
    }

    /// First half of the switch to the detail view, run when the detail
    /// load is issued.
    ///
    /// Saves the molecule state unless a snapshot already exists, then
    /// discards any previous detail model. Returns `false` without touching
    /// anything when no molecule is loaded.
    pub fn begin_atom_detail(&mut self) -> bool {
        let molecule = self.context.molecule();
        let Some(molecule_id) = molecule.model().map(|m| m.id) else {
            return false;
        };
        if molecule.is_empty() {
            return false;
        }
        if self.snapshot.is_none() {
            self.snapshot = Some(Snapshot {
                tables: self.context.tables().clone(),
                molecule: molecule_id,
            });
            log::debug!("snapshot taken for molecule {molecule_id:?}");
        } else {
            log::debug!("snapshot already held, keeping it");
        }
        self.context.detail_mut().clear();
        true
    }

    /// Second half of the switch: the detail model finished loading.
    /// Its tables replace the live ones, the molecule is hidden and the
    /// detail group shown.
    pub fn complete_atom_detail(&mut self, model: LoadedModel, tables: BindingTables) {
        log::info!("atom model {} ready", model.source);
        let _ = self.context.detail_mut().install(model);
        self.context.replace_tables(tables);
        self.mode = SceneMode::AtomDetail;
        self.sync_visibility();
    }

    /// The detail load failed. A molecule-mode scene is left as it was; a
    /// detail-mode scene (whose previous detail model is already gone)
    /// falls back to the molecule.
    pub fn abort_atom_detail(&mut self) {
        if self.mode == SceneMode::AtomDetail {
            let _ = self.back_to_molecule();
        }
    }

    /// Return from the detail view. Tables come back from the snapshot,
    /// which is kept. Returns `false` when already in molecule mode.
    pub fn back_to_molecule(&mut self) -> bool {
        if self.mode == SceneMode::Molecule {
            return false;
        }
        if let Some(snapshot) = &self.snapshot {
            if !self.context.molecule().holds(snapshot.molecule) {
                log::warn!("snapshot refers to a molecule that is no longer loaded");
            }
            self.context.replace_tables(snapshot.tables.clone());
        }
        // a selection made on the detail model means nothing to the molecule
        if let Some(fragment) = self.context.highlighted() {
            if self.context.detail().holds(fragment.model) {
                self.context.set_selection(None);
                self.context.highlight(None, [0.0; 3]);
            }
        }
        self.mode = SceneMode::Molecule;
        self.sync_visibility();
        log::debug!("back to molecule view");
        true
    }

    fn sync_visibility(&mut self) {
        let detail = self.mode == SceneMode::AtomDetail;
        self.context.molecule_mut().set_visible(!detail);
        self.context.detail_mut().set_visible(detail);
    }
}
