//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation (a button, a click on the viewport, an entry
//! of the atom list, or a programmatic call) is represented as a
//! [`ViewerCommand`]. Consumers construct commands and pass them to
//! [`ViewerEngine::execute`](super::ViewerEngine::execute).

use super::ViewerEngine;
use crate::error::ViewerError;

/// A discrete or parameterized operation the engine can perform.
///
/// ```ignore
/// engine.execute(ViewerCommand::SubmitFormula { formula: "H2O".into() })?;
/// engine.execute(ViewerCommand::PickAt { x: 400.0, y: 300.0 })?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    // ── Loading ─────────────────────────────────────────────────────
    /// Discard the scene and load the molecule for `formula`.
    SubmitFormula {
        /// Chemical formula as typed.
        formula: String,
    },

    /// Load the detail model for the selected atom's element.
    ShowAtomDetail,

    /// Leave the detail view.
    BackToMolecule,

    // ── Selection ───────────────────────────────────────────────────
    /// Pick at a viewport pixel (origin top-left).
    PickAt {
        /// Horizontal pixel.
        x: f32,
        /// Vertical pixel.
        y: f32,
    },

    /// Select an atom from the atom list.
    SelectAtom {
        /// Atom index.
        index: u32,
    },

    // ── View ────────────────────────────────────────────────────────
    /// Toggle idle rotation.
    ToggleAutoRotate,

    /// The viewport changed size.
    Resize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl ViewerEngine {
    /// Execute a single command.
    ///
    /// # Errors
    ///
    /// Load-issuing commands fail when their action is currently disabled
    /// (see [`ViewerError`]). Everything else always succeeds.
    pub fn execute(&mut self, command: ViewerCommand) -> Result<(), ViewerError> {
        match command {
            ViewerCommand::SubmitFormula { formula } => self.submit_formula(&formula)?,
            ViewerCommand::ShowAtomDetail => self.show_atom_detail()?,
            ViewerCommand::BackToMolecule => {
                let _ = self.back_to_molecule();
            }
            ViewerCommand::PickAt { x, y } => {
                let _ = self.pick_at(x, y);
            }
            ViewerCommand::SelectAtom { index } => {
                let _ = self.select_atom(index);
            }
            ViewerCommand::ToggleAutoRotate => {
                let _ = self.toggle_auto_rotate();
            }
            ViewerCommand::Resize { width, height } => self.resize(width, height),
        }
        Ok(())
    }
}
