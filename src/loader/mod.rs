//! Model loading: where bundle bytes come from, the staged pipeline that
//! turns them into a display-ready model, and the background thread that
//! runs it off the frame loop.

mod pipeline;
mod processor;
pub mod remote;
mod source;

use std::fmt;

pub use pipeline::{prepare_bundle, PreparedModel};
pub use processor::LoadProcessor;
#[cfg(feature = "http")]
pub use source::HttpModelSource;
pub use source::ModelSource;

use crate::error::LoadError;
use crate::options::SceneOptions;

/// The two independent load slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// Whole molecule from a formula.
    Molecule,
    /// Single-atom model from an element symbol.
    AtomDetail,
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Molecule => write!(f, "molecule"),
            Self::AtomDetail => write!(f, "atom detail"),
        }
    }
}

/// Work item for the load thread.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Which slot this load fills.
    pub kind: LoadKind,
    /// Token identifying this request; also becomes the model id.
    pub generation: u64,
    /// Formula or element symbol.
    pub key: String,
    /// Processing parameters in effect when the request was issued.
    pub scene: SceneOptions,
}

/// Outcome of one [`LoadRequest`].
#[derive(Debug, Clone)]
pub struct LoadCompletion {
    /// Slot of the originating request.
    pub kind: LoadKind,
    /// Generation of the originating request.
    pub generation: u64,
    /// Formula or element symbol.
    pub key: String,
    /// The prepared model, or the stage that failed.
    pub result: Result<PreparedModel, LoadError>,
}
