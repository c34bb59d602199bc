use std::sync::atomic::{AtomicBool, Ordering};

use super::escape::escape_html;

/// Style rule that gives rewritten "strong" spans in highlighted code their look.
pub const CUSTOM_STRONG_RULE: &str = ".hljs-strong-custom { color: white; font-weight: normal; }";

/// Display surface that accepts global style rules.
pub trait StyleRegistry {
    fn insert_rule(&mut self, css: &str);
}

/// Inserts [`CUSTOM_STRONG_RULE`] into a surface at most once.
#[derive(Debug, Default)]
pub struct StyleInjector {
    injected: AtomicBool,
}

/// Process-wide injector used by [`inject_style`].
pub static STYLE_INJECTOR: StyleInjector = StyleInjector::new();

impl StyleInjector {
    pub const fn new() -> Self {
        Self {
            injected: AtomicBool::new(false),
        }
    }

    /// Returns `true` when this call inserted the rule.
    ///
    /// Without a surface nothing is inserted and the flag stays unset, so a
    /// later call with a real surface still injects.
    pub fn ensure_injected(&self, surface: Option<&mut dyn StyleRegistry>) -> bool {
        let Some(surface) = surface else {
            log::trace!("no style surface available, skipping rule injection");
            return false;
        };
        if self.injected.swap(true, Ordering::AcqRel) {
            return false;
        }
        surface.insert_rule(CUSTOM_STRONG_RULE);
        log::debug!("injected highlight style rule");
        true
    }

    pub fn is_injected(&self) -> bool {
        self.injected.load(Ordering::Acquire)
    }
}

pub fn inject_style(surface: Option<&mut dyn StyleRegistry>) -> bool {
    STYLE_INJECTOR.ensure_injected(surface)
}

/// In-process HTML document: global style rules plus body markup.
#[derive(Debug, Default, Clone)]
pub struct Document {
    styles: Vec<String>,
    body: String,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_rules(&self) -> &[String] {
        &self.styles
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Serialises the document as a standalone page.
    pub fn to_page(&self, title: &str) -> String {
        let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        page.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        if !self.styles.is_empty() {
            page.push_str("<style>\n");
            for rule in &self.styles {
                page.push_str(rule);
                page.push('\n');
            }
            page.push_str("</style>\n");
        }
        page.push_str("</head>\n<body>\n");
        page.push_str(&self.body);
        page.push_str("\n</body>\n</html>\n");
        page
    }
}

impl StyleRegistry for Document {
    fn insert_rule(&mut self, css: &str) {
        self.styles.push(css.to_string());
    }
}
