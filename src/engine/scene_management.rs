use super::{PendingLoad, StatusMessage, ViewerEngine};
use crate::error::ViewerError;
use crate::loader::{LoadCompletion, LoadKind, LoadRequest};

// ── Actions ──

impl ViewerEngine {
    /// Drop the current scene and start loading the molecule for `formula`.
    ///
    /// A detail load still in flight is abandoned: its result will be
    /// discarded when it arrives.
    ///
    /// # Errors
    ///
    /// [`ViewerError::EmptyFormula`] for blank input,
    /// [`ViewerError::Busy`] while a molecule load is running.
    pub fn submit_formula(&mut self, formula: &str) -> Result<(), ViewerError> {
        let formula = formula.trim();
        if formula.is_empty() {
            return Err(ViewerError::EmptyFormula);
        }
        if self.is_loading(LoadKind::Molecule) {
            return Err(ViewerError::Busy(LoadKind::Molecule));
        }

        self.controller.reset_for_new_formula();
        if let Some(abandoned) = self.detail_load.take() {
            log::debug!("abandoning atom detail load of {}", abandoned.key);
        }
        let pending = self.issue(LoadKind::Molecule, formula);
        self.molecule_load = Some(pending);
        self.status = StatusMessage::Loading(format!("Generating 3D model for {formula}..."));
        Ok(())
    }

    /// Start loading the detail model for the selected atom's element.
    ///
    /// # Errors
    ///
    /// [`ViewerError::NoSelection`] without a selected atom,
    /// [`ViewerError::Busy`] while a detail load is running.
    pub fn show_atom_detail(&mut self) -> Result<(), ViewerError> {
        if self.is_loading(LoadKind::AtomDetail) {
            return Err(ViewerError::Busy(LoadKind::AtomDetail));
        }
        let element = self
            .context()
            .selection()
            .map(|atom| atom.element.clone())
            .ok_or(ViewerError::NoSelection)?;
        if !self.controller.begin_atom_detail() {
            return Err(ViewerError::NoSelection);
        }

        let pending = self.issue(LoadKind::AtomDetail, &element);
        self.detail_load = Some(pending);
        self.status = StatusMessage::Loading(format!("Loading {element} atom model..."));
        Ok(())
    }

    /// Return to the molecule view. A detail load still in flight is
    /// abandoned. Returns `false` when already in the molecule view.
    pub fn back_to_molecule(&mut self) -> bool {
        let _ = self.detail_load.take();
        self.controller.back_to_molecule()
    }

    fn issue(&mut self, kind: LoadKind, key: &str) -> PendingLoad {
        let generation = self.next_generation;
        self.next_generation += 1;
        log::info!("{kind} load of {key} issued (generation {generation})");
        self.processor.submit(LoadRequest {
            kind,
            generation,
            key: key.to_owned(),
            scene: self.options.scene.clone(),
        });
        PendingLoad {
            generation,
            key: key.to_owned(),
        }
    }
}

// ── Completions ──

impl ViewerEngine {
    pub(super) fn apply_completions(&mut self) {
        for kind in [LoadKind::Molecule, LoadKind::AtomDetail] {
            let Some(completion) = self.processor.try_recv(kind) else {
                continue;
            };
            if self.pending(kind).map(|p| p.generation) != Some(completion.generation) {
                log::debug!(
                    "discarding stale {kind} completion for {} (generation {})",
                    completion.key,
                    completion.generation
                );
                continue;
            }
            match kind {
                LoadKind::Molecule => {
                    self.molecule_load = None;
                    self.finish_molecule(completion);
                }
                LoadKind::AtomDetail => {
                    self.detail_load = None;
                    self.finish_detail(completion);
                }
            }
        }
    }

    fn finish_molecule(&mut self, completion: LoadCompletion) {
        match completion.result {
            Ok(prepared) => {
                self.controller
                    .install_molecule(prepared.model, prepared.tables, prepared.atoms);
                self.status = StatusMessage::Info(format!(
                    "{}: {} atoms",
                    completion.key,
                    self.context().atom_count()
                ));
            }
            Err(e) => {
                log::error!("loading {} failed: {e}", completion.key);
                self.status = StatusMessage::Error(e.to_string());
            }
        }
    }

    fn finish_detail(&mut self, completion: LoadCompletion) {
        match completion.result {
            Ok(prepared) => {
                self.controller
                    .complete_atom_detail(prepared.model, prepared.tables);
                self.status = StatusMessage::Info(format!("{} atom model", completion.key));
            }
            Err(e) => {
                log::error!("loading the {} atom model failed: {e}", completion.key);
                self.controller.abort_atom_detail();
                self.status = StatusMessage::Error(e.to_string());
            }
        }
    }
}
