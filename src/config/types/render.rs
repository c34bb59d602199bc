use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub markdown: MarkdownConfig,
    pub math: MathConfig,
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: false,
            smart_punctuation: false,
        }
    }
}

/// Math typesetting options. Keys of `macros` include the leading backslash.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MathConfig {
    pub macros: BTreeMap<String, String>,
}

impl Default for MathConfig {
    fn default() -> Self {
        let mut macros = BTreeMap::new();
        macros.insert("\\RR".to_string(), "\\mathbb{R}".to_string());
        Self { macros }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enabled: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
