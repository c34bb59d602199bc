//! Chat transcript rendering.
//!
//! [`render`] turns message text (markdown with fenced code and `$`/`$$`
//! math) into sanitised HTML. [`view`] keeps a transcript's items animated
//! across updates and produces the list markup.

pub mod config;
pub mod error;
pub mod render;
pub mod view;

pub use error::{AlreadyInstalled, HighlightError, MathError};
pub use render::{render, Document, Renderer, StyleRegistry};
pub use view::{Message, Transcript, TranscriptView, VisualTree};
