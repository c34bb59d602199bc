//! TeX to MathML typesetting for `$...$` and `$$...$$` spans.
//!
//! Configured macros are expanded here first, then `pulldown-latex` does the
//! typesetting. Its output is checked against a MathML allowlist before it is
//! wrapped for the page.

mod guard;
mod lexer;
mod macros;

use pulldown_latex::config::{DisplayMode, RenderConfig};
use pulldown_latex::{push_mathml, Parser, Storage};

use crate::config::MathConfig;
use crate::error::MathError;
use crate::render::escape::escape_html;

use macros::MacroTable;

/// Deepest brace nesting accepted in one expression.
const MAX_DEPTH: usize = 96;

/// Typesets math spans with a fixed macro table.
#[derive(Debug, Clone, Default)]
pub struct MathTypesetter {
    macros: MacroTable,
}

impl MathTypesetter {
    pub fn new(config: &MathConfig) -> Self {
        let macros = MacroTable::from_config(&config.macros);
        log::debug!("math typesetter ready with {} macros", macros.len());
        Self { macros }
    }

    /// Returns the wrapped MathML for `source`, or an escaped error fallback
    /// when the expression is malformed.
    pub fn typeset(&self, source: &str, display: bool) -> String {
        match self.to_mathml(source, display) {
            Ok(math) => {
                let class = if display {
                    "math math-display"
                } else {
                    "math math-inline"
                };
                format!("<span class=\"{class}\">{math}</span>")
            }
            Err(err) => {
                log::debug!("math expression failed to typeset: {err}");
                let delim = if display { "$$" } else { "$" };
                format!(
                    "<code class=\"math-error\">{}</code>",
                    escape_html(&format!("{delim}{source}{delim}"))
                )
            }
        }
    }

    /// Expands macros in `source` and returns the bare `<math>` element.
    pub fn to_mathml(&self, source: &str, display: bool) -> Result<String, MathError> {
        let tokens = self.macros.expand(lexer::tokenize(source))?;
        if lexer::max_depth(&tokens) > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        let expanded = lexer::to_source(&tokens);

        let storage = Storage::new();
        // The writer renders parse errors inline; surface them as a failure instead.
        if let Some(err) = Parser::new(&expanded, &storage).find_map(Result::err) {
            return Err(MathError::Syntax(err.to_string()));
        }

        let config = RenderConfig {
            display_mode: if display {
                DisplayMode::Block
            } else {
                DisplayMode::Inline
            },
            ..RenderConfig::default()
        };
        let mut out = String::new();
        push_mathml(&mut out, Parser::new(&expanded, &storage), config)
            .map_err(|err| MathError::Render(err.to_string()))?;
        guard::check_mathml(&out)?;
        Ok(out)
    }
}
