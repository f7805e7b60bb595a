use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Idle animation toggles.
pub struct DisplayOptions {
    /// Spin the visible model about +Y while idle.
    #[schemars(title = "Auto Rotate")]
    pub auto_rotate: bool,
    /// Idle spin rate in radians per second.
    #[schemars(title = "Rotate Speed", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            rotate_speed: 0.6,
        }
    }
}
