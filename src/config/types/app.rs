use serde::{Deserialize, Serialize};

use super::{LoggingConfig, RenderConfig, ViewConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub view: ViewConfig,
    pub logging: LoggingConfig,
}
