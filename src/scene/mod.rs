//! Scene model: loaded hierarchies, the two display groups, session state
//! and the molecule / atom-detail mode controller.
//!
//! Everything the viewer displays is a [`LoadedModel`] sitting in one of two
//! [`SceneGroup`]s. The [`ModeController`] owns the [`SceneContext`] and is
//! the only place that flips group visibility.

mod context;
mod group;
mod hierarchy;
mod mode;

pub use context::SceneContext;
pub use group::{LoadedModel, SceneGroup};
pub use hierarchy::{Fragment, FragmentId, ModelHierarchy, ModelId, Node};
pub use mode::{ModeController, SceneMode, Snapshot};
