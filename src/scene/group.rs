use super::hierarchy::{ModelHierarchy, ModelId};
use crate::geometry::ModelTransform;

/// A fully bound and smoothed model placed in the world.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Load generation this model came from.
    pub id: ModelId,
    /// What was requested: the formula or the element symbol.
    pub source: String,
    /// Geometry and materials.
    pub hierarchy: ModelHierarchy,
    /// World placement.
    pub transform: ModelTransform,
}

/// One displayable slot of the scene (the molecule or the atom detail).
#[derive(Debug, Clone, Default)]
pub struct SceneGroup {
    model: Option<LoadedModel>,
    visible: bool,
}

impl SceneGroup {
    /// Empty group with the given visibility.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        Self {
            model: None,
            visible,
        }
    }

    /// Displayed model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    /// Mutable access to the displayed model.
    pub fn model_mut(&mut self) -> Option<&mut LoadedModel> {
        self.model.as_mut()
    }

    /// Replace the contents, returning what was there.
    pub fn install(&mut self, model: LoadedModel) -> Option<LoadedModel> {
        self.model.replace(model)
    }

    /// Discard the contents. Visibility is untouched.
    pub fn clear(&mut self) {
        self.model = None;
    }

    /// Whether the group holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.as_ref().is_none_or(|m| m.hierarchy.is_empty())
    }

    /// Whether the group is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the group.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether this group currently holds the model with `id`.
    #[must_use]
    pub fn holds(&self, id: ModelId) -> bool {
        self.model.as_ref().is_some_and(|m| m.id == id)
    }
}
