mod app;
mod logging;
mod render;
mod view;

const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;
const DEFAULT_ENTER_OFFSET: f32 = 20.0;
const DEFAULT_ENTER_DURATION_MS: u64 = 300;
const DEFAULT_EXIT_DURATION_MS: u64 = 1_000;

pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use render::{HighlightConfig, MarkdownConfig, MathConfig, RenderConfig};
pub use view::ViewConfig;
