use std::collections::BTreeMap;

use super::{StatusMessage, ViewerEngine};
use crate::annotation::AtomRecord;
use crate::camera::Camera;
use crate::loader::LoadKind;
use crate::options::Options;
use crate::scene::{ModeController, SceneContext, SceneMode};

// ── Accessors ──

impl ViewerEngine {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mode controller (scene, mode and snapshot).
    #[must_use]
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    /// Session state.
    #[must_use]
    pub fn context(&self) -> &SceneContext {
        self.controller.context()
    }

    /// Active view mode.
    #[must_use]
    pub fn mode(&self) -> SceneMode {
        self.controller.mode()
    }

    /// Viewing camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Status line.
    #[must_use]
    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}

// ── Atom list ──

impl ViewerEngine {
    /// Bound atoms of the visible model, ordered by index.
    #[must_use]
    pub fn atom_list(&self) -> Vec<AtomRecord> {
        self.context().atom_list()
    }

    /// Bound atoms per element.
    #[must_use]
    pub fn element_counts(&self) -> BTreeMap<String, usize> {
        self.context().element_counts()
    }
}

// ── Action enablement ──

impl ViewerEngine {
    /// Whether a load of `kind` is in flight.
    #[must_use]
    pub fn is_loading(&self, kind: LoadKind) -> bool {
        self.pending(kind).is_some()
    }

    /// Whether the formula input is accepted.
    #[must_use]
    pub fn can_submit_formula(&self) -> bool {
        !self.is_loading(LoadKind::Molecule)
    }

    /// Whether the "view atom model" action is enabled: an atom is selected
    /// and no detail load is running.
    #[must_use]
    pub fn can_show_atom_detail(&self) -> bool {
        self.context().selection().is_some() && !self.is_loading(LoadKind::AtomDetail)
    }
}
