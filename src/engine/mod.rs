//! The viewer engine: one frame task plus the user actions around it.
//!
//! All scene state lives on the thread that owns the engine. Loads run on
//! the [`LoadProcessor`] thread; [`ViewerEngine::tick`] picks up their
//! results without blocking, so the previous scene keeps animating while a
//! load is in flight.

mod command;
mod queries;
mod scene_management;

pub use command::ViewerCommand;

use crate::annotation::AtomRecord;
use crate::camera::{screen_to_ndc, Camera};
use crate::error::ViewerError;
use crate::loader::{LoadKind, LoadProcessor, ModelSource};
use crate::options::Options;
use crate::picking::{PickOutcome, SelectionResolver};
use crate::scene::{ModeController, SceneMode};

/// Text for the status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusMessage {
    /// Nothing to report.
    #[default]
    Idle,
    /// A load is running.
    Loading(String),
    /// Something finished.
    Info(String),
    /// The last action failed; it can be retried.
    Error(String),
}

/// A load the engine is waiting for.
#[derive(Debug, Clone)]
struct PendingLoad {
    generation: u64,
    key: String,
}

/// Interactive viewer state: options, scene, camera and load bookkeeping.
pub struct ViewerEngine {
    options: Options,
    controller: ModeController,
    resolver: SelectionResolver,
    camera: Camera,
    processor: LoadProcessor,
    next_generation: u64,
    molecule_load: Option<PendingLoad>,
    detail_load: Option<PendingLoad>,
    status: StatusMessage,
    viewport: (u32, u32),
}

impl ViewerEngine {
    /// Engine fetching bundles from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the load thread cannot be
    /// started.
    pub fn new(source: Box<dyn ModelSource>, options: Options) -> Result<Self, ViewerError> {
        let processor = LoadProcessor::new(source)?;
        let viewport = (800, 600);
        let camera = Camera::from_options(&options.camera, aspect(viewport));
        Ok(Self {
            options,
            controller: ModeController::new(),
            resolver: SelectionResolver::default(),
            camera,
            processor,
            next_generation: 1,
            molecule_load: None,
            detail_load: None,
            status: StatusMessage::Idle,
            viewport,
        })
    }

    /// Frame task: apply finished loads, then advance the idle rotation of
    /// the visible model by `dt` seconds. Never blocks.
    pub fn tick(&mut self, dt: f32) {
        self.apply_completions();

        if self.options.display.auto_rotate {
            let step = self.options.display.rotate_speed * dt;
            if let Some(model) = self.controller.context_mut().visible_group_mut().model_mut() {
                model.transform.rotate(step);
            }
        }
    }

    /// Resolve a click at viewport pixel (`screen_x`, `screen_y`).
    pub fn pick_at(&mut self, screen_x: f32, screen_y: f32) -> PickOutcome {
        let (w, h) = self.viewport;
        if w == 0 || h == 0 {
            return PickOutcome::NoHit;
        }
        let ndc = screen_to_ndc(screen_x, screen_y, w as f32, h as f32);
        let ray = self.camera.ray_from_ndc(ndc);
        let mode = self.controller.mode();
        self.resolver.resolve(
            mode,
            self.controller.context_mut(),
            ray,
            self.options.scene.highlight_emissive,
        )
    }

    /// Select an atom from the atom list and highlight its fragment.
    /// Selection belongs to the molecule view; in the detail view this
    /// does nothing and returns `None`.
    pub fn select_atom(&mut self, index: u32) -> Option<AtomRecord> {
        if self.controller.mode() != SceneMode::Molecule {
            return None;
        }
        let color = self.options.scene.highlight_emissive;
        self.controller.context_mut().select_atom(index, color)
    }

    /// Flip idle rotation. Returns the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        let display = &mut self.options.display;
        display.auto_rotate = !display.auto_rotate;
        display.auto_rotate
    }

    /// The viewport changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        if width > 0 && height > 0 {
            self.camera.aspect = aspect(self.viewport);
        }
    }

    /// Replace the options. Camera settings apply at once; scene settings
    /// apply to the next load.
    pub fn set_options(&mut self, options: Options) {
        self.camera = Camera::from_options(&options.camera, self.camera.aspect);
        self.options = options;
    }

    fn pending(&self, kind: LoadKind) -> Option<&PendingLoad> {
        match kind {
            LoadKind::Molecule => self.molecule_load.as_ref(),
            LoadKind::AtomDetail => self.detail_load.as_ref(),
        }
    }
}

fn aspect((w, h): (u32, u32)) -> f32 {
    w as f32 / h.max(1) as f32
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::asset::test_bundle::{atom_bundle, h2o_bundle};
    use crate::error::LoadError;

    struct Service;

    impl ModelSource for Service {
        fn fetch_molecule(&self, formula: &str) -> Result<Vec<u8>, LoadError> {
            match formula {
                "H2O" => Ok(h2o_bundle()),
                "EMPTY" => Ok(Vec::new()),
                _ => Err(LoadError::Remote("no chemistry molecule".to_owned())),
            }
        }

        fn fetch_atom_model(&self, element: &str) -> Result<Vec<u8>, LoadError> {
            match element {
                "O" | "H" => Ok(atom_bundle(element)),
                _ => Err(LoadError::Remote("no atom model".to_owned())),
            }
        }
    }

    fn engine() -> ViewerEngine {
        let mut options = Options::default();
        options.display.auto_rotate = false;
        ViewerEngine::new(Box::new(Service), options).unwrap()
    }

    fn settle(e: &mut ViewerEngine) {
        let deadline = web_time::Instant::now() + Duration::from_secs(10);
        loop {
            e.tick(0.0);
            if !e.is_loading(LoadKind::Molecule) && !e.is_loading(LoadKind::AtomDetail) {
                return;
            }
            assert!(web_time::Instant::now() < deadline, "load timed out");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn water() -> ViewerEngine {
        let mut e = engine();
        e.submit_formula("H2O").unwrap();
        settle(&mut e);
        e
    }

    #[test]
    fn water_loads_and_center_click_selects_oxygen() {
        let mut e = water();
        assert_eq!(e.atom_list().len(), 3);
        assert_eq!(e.context().tables().len(), 3);
        assert!(matches!(e.status(), StatusMessage::Info(_)));
        assert!(!e.can_show_atom_detail());

        let outcome = e.pick_at(400.0, 300.0);
        let PickOutcome::Atom(atom) = outcome else {
            unreachable!("expected atom hit, got {outcome:?}");
        };
        assert_eq!(atom.element, "O");
        assert_eq!(atom.index, 0);
        assert_eq!(e.context().selection(), Some(&atom));
        assert!(e.can_show_atom_detail());
    }

    #[test]
    fn bond_click_clears_selection() {
        let mut e = water();
        assert!(matches!(e.pick_at(400.0, 300.0), PickOutcome::Atom(_)));
        assert_eq!(e.pick_at(450.0, 300.0), PickOutcome::NonAtom);
        assert!(e.context().selection().is_none());
        assert!(e.context().highlighted().is_none());
        assert_eq!(e.pick_at(5.0, 5.0), PickOutcome::NoHit);
    }

    #[test]
    fn detail_round_trip() {
        let mut e = water();
        let _ = e.pick_at(400.0, 300.0);
        e.show_atom_detail().unwrap();
        assert!(e.is_loading(LoadKind::AtomDetail));
        assert!(!e.can_show_atom_detail());
        assert_eq!(e.mode(), SceneMode::Molecule);
        assert_eq!(e.controller().snapshot().unwrap().tables.len(), 3);

        settle(&mut e);
        assert_eq!(e.mode(), SceneMode::AtomDetail);
        let ctx = e.context();
        assert!(!ctx.molecule().is_visible());
        assert!(ctx.detail().is_visible());
        assert_eq!(ctx.detail().model().unwrap().source, "O");
        assert_eq!(e.pick_at(400.0, 300.0), PickOutcome::Inactive);
        assert!(e.select_atom(0).is_none());
        assert_eq!(e.context().selection().unwrap().element, "O");

        assert!(e.back_to_molecule());
        assert_eq!(e.context().selection().unwrap().index, 0);
        assert!(e.context().molecule().holds(e.context().highlighted().unwrap().model));
        assert_eq!(e.mode(), SceneMode::Molecule);
        assert_eq!(e.context().tables().len(), 3);
        assert!(e.controller().snapshot().is_some());
        assert!(e.context().molecule().is_visible());
        assert!(matches!(e.pick_at(400.0, 300.0), PickOutcome::Atom(_)));
    }

    #[test]
    fn new_formula_is_a_hard_reset() {
        let mut e = water();
        let _ = e.select_atom(1).unwrap();
        e.show_atom_detail().unwrap();
        settle(&mut e);

        e.submit_formula("H2O").unwrap();
        assert!(e.controller().snapshot().is_none());
        assert!(e.context().tables().is_empty());
        assert!(e.context().selection().is_none());
        assert!(e.context().molecule().model().is_none());
        assert!(e.context().detail().model().is_none());
        assert_eq!(e.mode(), SceneMode::Molecule);

        settle(&mut e);
        assert_eq!(e.atom_list().len(), 3);
    }

    #[test]
    fn stale_detail_completion_is_discarded() {
        let mut e = water();
        let _ = e.select_atom(0).unwrap();
        e.show_atom_detail().unwrap();
        e.submit_formula("H2O").unwrap();
        settle(&mut e);
        assert_eq!(e.mode(), SceneMode::Molecule);
        assert!(e.context().detail().model().is_none());
        assert!(e.context().molecule().is_visible());
    }

    #[test]
    fn failures_surface_and_clear_busy() {
        let mut e = engine();
        e.submit_formula("XYZ").unwrap();
        assert!(matches!(
            e.submit_formula("H2O"),
            Err(ViewerError::Busy(LoadKind::Molecule))
        ));
        settle(&mut e);
        assert_eq!(
            e.status(),
            &StatusMessage::Error("no chemistry molecule".to_owned())
        );
        assert!(e.can_submit_formula());

        e.submit_formula("EMPTY").unwrap();
        settle(&mut e);
        assert_eq!(
            e.status(),
            &StatusMessage::Error(LoadError::EmptyResponse.to_string())
        );

        assert!(matches!(e.submit_formula("  "), Err(ViewerError::EmptyFormula)));
        assert!(matches!(e.show_atom_detail(), Err(ViewerError::NoSelection)));
    }

    #[test]
    fn failed_detail_keeps_molecule_view() {
        let mut e = engine();
        let zinc = crate::asset::test_bundle::zip_entries(&[(
            "model.obj",
            "# ATOM_0: Zn 0 0 0\no molecule\ng atom_Zn_0\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )]);
        // drive the molecule straight in; the service has no zinc formula
        let prepared = crate::loader::prepare_bundle(
            &zinc,
            crate::scene::ModelId(99),
            "Zn",
            &e.options().scene,
        )
        .unwrap();
        e.controller
            .install_molecule(prepared.model, prepared.tables, prepared.atoms);

        let _ = e.select_atom(0).unwrap();
        e.show_atom_detail().unwrap();
        settle(&mut e);
        assert_eq!(e.mode(), SceneMode::Molecule);
        assert!(e.context().molecule().is_visible());
        assert_eq!(e.status(), &StatusMessage::Error("no atom model".to_owned()));
        assert!(e.can_show_atom_detail());
    }

    #[test]
    fn commands_and_rotation() {
        let mut e = water();
        e.execute(ViewerCommand::SelectAtom { index: 2 }).unwrap();
        assert_eq!(e.context().selection().unwrap().index, 2);

        e.execute(ViewerCommand::Resize {
            width: 1000,
            height: 500,
        })
        .unwrap();
        assert_eq!(e.camera().aspect, 2.0);

        e.execute(ViewerCommand::ToggleAutoRotate).unwrap();
        assert!(e.options().display.auto_rotate);
        e.tick(1.0);
        let rotation = e.context().molecule().model().unwrap().transform.rotation_y;
        assert!((rotation - e.options().display.rotate_speed).abs() < 1e-6);

        e.execute(ViewerCommand::PickAt { x: 500.0, y: 250.0 }).unwrap();
        assert_eq!(e.context().selection().unwrap().element, "O");

        e.execute(ViewerCommand::ShowAtomDetail).unwrap();
        settle(&mut e);
        assert_eq!(e.mode(), SceneMode::AtomDetail);
        e.execute(ViewerCommand::BackToMolecule).unwrap();
        assert_eq!(e.mode(), SceneMode::Molecule);

        assert!(e
            .execute(ViewerCommand::SubmitFormula {
                formula: String::new()
            })
            .is_err());
    }
}
