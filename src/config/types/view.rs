use serde::{Deserialize, Serialize};

use super::{DEFAULT_ENTER_DURATION_MS, DEFAULT_ENTER_OFFSET, DEFAULT_EXIT_DURATION_MS};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Vertical offset, in pixels, an entering item starts from.
    pub enter_offset: f32,
    pub enter_duration_ms: u64,
    pub exit_duration_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            enter_offset: DEFAULT_ENTER_OFFSET,
            enter_duration_ms: DEFAULT_ENTER_DURATION_MS,
            exit_duration_ms: DEFAULT_EXIT_DURATION_MS,
        }
    }
}
