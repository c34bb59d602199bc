//! Message text to HTML: markdown, highlighted code, typeset math.

mod escape;
mod highlight;
mod markdown;
mod math;
mod style;

use std::sync::OnceLock;

use pulldown_cmark::Options;

use crate::config::RenderConfig;
use crate::error::AlreadyInstalled;

pub use escape::escape_html;
pub use highlight::{
    highlight_code, is_known_language, rewrite_strong_classes, CodeBlockFormatter,
    PlainFormatter, SyntectFormatter, BOLD_CLASS, CLASS_PREFIX, STRONG_CUSTOM_CLASS,
};
pub use markdown::{is_safe_url, parser_options};
pub use math::MathTypesetter;
pub use style::{
    inject_style, Document, StyleInjector, StyleRegistry, CUSTOM_STRONG_RULE, STYLE_INJECTOR,
};

static GLOBAL: OnceLock<Renderer> = OnceLock::new();

/// The message rendering pipeline. Immutable once built, so one instance
/// can be shared by every view in the process.
pub struct Renderer {
    options: Options,
    formatter: Box<dyn CodeBlockFormatter + Send + Sync>,
    math: MathTypesetter,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("math", &self.math)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        let formatter: Box<dyn CodeBlockFormatter + Send + Sync> = if config.highlight.enabled {
            Box::new(SyntectFormatter)
        } else {
            Box::new(PlainFormatter)
        };
        Self::with_formatter(config, formatter)
    }

    /// Builds a renderer with a caller-supplied code block formatter.
    pub fn with_formatter(
        config: &RenderConfig,
        formatter: Box<dyn CodeBlockFormatter + Send + Sync>,
    ) -> Self {
        Self {
            options: parser_options(&config.markdown),
            formatter,
            math: MathTypesetter::new(&config.math),
        }
    }

    /// Installs the process-wide renderer. Only the first call wins; the
    /// configuration cannot change afterwards.
    pub fn install(config: &RenderConfig) -> Result<&'static Renderer, AlreadyInstalled> {
        let mut installed = false;
        let renderer = GLOBAL.get_or_init(|| {
            installed = true;
            Renderer::new(config)
        });
        if installed {
            log::debug!("installed global renderer");
            Ok(renderer)
        } else {
            Err(AlreadyInstalled)
        }
    }

    /// The process-wide renderer, built from defaults if nothing was
    /// installed.
    pub fn global() -> &'static Renderer {
        GLOBAL.get_or_init(Renderer::default)
    }

    /// Converts message text into sanitised HTML. Never fails: malformed
    /// code or math degrade to escaped text.
    pub fn render(&self, content: &str) -> String {
        markdown::render_markdown(content, self.options, self.formatter.as_ref(), &self.math)
    }

    /// Renders `content` and makes sure the highlight style rule is present
    /// on `surface`.
    pub fn render_into(&self, content: &str, surface: &mut dyn StyleRegistry) -> String {
        self.render_with(content, surface, &STYLE_INJECTOR)
    }

    /// Like [`Renderer::render_into`], with a caller-owned injector in place
    /// of the process-wide one.
    pub fn render_with(
        &self,
        content: &str,
        surface: &mut dyn StyleRegistry,
        injector: &StyleInjector,
    ) -> String {
        injector.ensure_injected(Some(surface));
        self.render(content)
    }
}

/// Renders with the process-wide renderer.
pub fn render(content: &str) -> String {
    Renderer::global().render(content)
}
