use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::smoothing::MAX_NORMAL_PRECISION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// Post-load processing and highlight parameters.
pub struct SceneOptions {
    /// Decimal places kept when welding vertex positions for smoothing.
    #[schemars(title = "Normal Precision", range(min = 1, max = 6))]
    pub normal_precision: u32,
    /// Models whose largest extent exceeds this are shrunk to it.
    #[schemars(title = "Max Extent", range(min = 0.5, max = 20.0), extend("step" = 0.5))]
    pub fit_max_extent: f32,
    /// Models whose largest extent is below this are enlarged.
    #[schemars(title = "Min Extent", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub fit_min_extent: f32,
    /// Scale factor applied to small models.
    #[schemars(skip)]
    pub fit_upscale: f32,
    /// Emissive color applied to the highlighted atom fragment.
    #[schemars(skip)]
    pub highlight_emissive: [f32; 3],
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            normal_precision: 3,
            fit_max_extent: 3.0,
            fit_min_extent: 0.5,
            fit_upscale: 2.0,
            highlight_emissive: [0.27, 0.27, 0.27],
        }
    }
}

impl SceneOptions {
    /// Reject values the load pipeline cannot honour.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_NORMAL_PRECISION).contains(&self.normal_precision) {
            return Err(format!(
                "scene.normal_precision must be between 1 and {MAX_NORMAL_PRECISION}, got {}",
                self.normal_precision
            ));
        }
        Ok(())
    }
}
