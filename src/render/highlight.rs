use std::sync::OnceLock;

use regex::Regex;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::HighlightError;

/// Class prefix applied to every scope atom emitted by the highlighter.
pub const CLASS_PREFIX: &str = "hljs-";
/// Class the highlighter uses for "strong" (bold) spans.
pub const BOLD_CLASS: &str = "hljs-bold";
/// Replacement for [`BOLD_CLASS`], styled by the injected rule.
pub const STRONG_CUSTOM_CLASS: &str = "hljs-strong-custom";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static CLASS_ATTR: OnceLock<Regex> = OnceLock::new();

/// Turns a fenced code block into markup.
///
/// Returning `None` tells the markdown stage to emit its default escaped
/// `<pre><code>` block instead.
pub trait CodeBlockFormatter {
    fn format(&self, code: &str, lang: Option<&str>) -> Option<String>;
}

/// Formatter that never highlights.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl CodeBlockFormatter for PlainFormatter {
    fn format(&self, _code: &str, _lang: Option<&str>) -> Option<String> {
        None
    }
}

/// Classed-HTML highlighting backed by syntect's bundled syntaxes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectFormatter;

impl CodeBlockFormatter for SyntectFormatter {
    fn format(&self, code: &str, lang: Option<&str>) -> Option<String> {
        let lang = lang?;
        if !is_known_language(lang) {
            log::trace!("no syntax for language tag {lang:?}, using plain block");
            return None;
        }
        match highlight_code(code, lang) {
            Ok(html) => Some(format!(
                "<pre class=\"code-block\"><code>{}</code></pre>\n",
                rewrite_strong_classes(&html)
            )),
            Err(err) => {
                log::debug!("highlighting {lang} block failed: {err}");
                None
            }
        }
    }
}

pub fn is_known_language(lang: &str) -> bool {
    syntax_set().find_syntax_by_token(lang).is_some()
}

/// Highlights `code` as `lang`, returning classed spans without a wrapper.
pub fn highlight_code(code: &str, lang: &str) -> Result<String, HighlightError> {
    let syntax_set = syntax_set();
    let syntax = syntax_set
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    let mut generator = ClassedHTMLGenerator::new_with_class_style(
        syntax,
        syntax_set,
        ClassStyle::SpacedPrefixed {
            prefix: CLASS_PREFIX,
        },
    );
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// Replaces the `hljs-bold` token in every `class` attribute with
/// `hljs-strong-custom`. Other tokens and text content are left alone.
pub fn rewrite_strong_classes(html: &str) -> String {
    let pattern = CLASS_ATTR
        .get_or_init(|| Regex::new(r#"class="([^"]*)""#).expect("class attribute regex is valid"));
    pattern
        .replace_all(html, |caps: &regex::Captures<'_>| {
            let classes = caps[1]
                .split_whitespace()
                .map(|class| {
                    if class == BOLD_CLASS {
                        STRONG_CUSTOM_CLASS
                    } else {
                        class
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("class=\"{classes}\"")
        })
        .into_owned()
}

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}
