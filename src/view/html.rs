use std::fmt::Write as _;

use super::{ItemKey, VisualItem, VisualTree};
use crate::render::{Document, StyleInjector, StyleRegistry, STYLE_INJECTOR};

const LIST_CLASS: &str = "pb-4";

impl VisualTree {
    /// Serialises the tree as an ordered list. An absent list renders as an
    /// empty string.
    pub fn to_html(&self) -> String {
        let Some(items) = self.list.as_ref() else {
            return String::new();
        };
        let mut out = format!("<ol class=\"{LIST_CLASS}\">");
        for item in items {
            write_item(&mut out, item);
        }
        out.push_str("</ol>");
        out
    }

    /// Replaces the body of `document` with this tree, injecting the
    /// highlight style rule on first use.
    pub fn mount_into(&self, document: &mut Document) {
        self.mount_with(document, &STYLE_INJECTOR);
    }

    /// Like [`VisualTree::mount_into`], with a caller-owned injector.
    pub fn mount_with(&self, document: &mut Document, injector: &StyleInjector) {
        injector.ensure_injected(Some(document as &mut dyn StyleRegistry));
        document.set_body(self.to_html());
    }
}

fn write_item(out: &mut String, item: &VisualItem) {
    out.push_str("<li");
    if let Some(class) = item.bubble.row_class() {
        let _ = write!(out, " class=\"{class}\"");
    }
    let _ = write!(
        out,
        " data-key=\"{}\" data-phase=\"{}\"><div class=\"{}\" style=\"opacity:{:.3};transform:translateY({:.1}px)\">",
        key_attr(item.id.key),
        item.phase.as_str(),
        item.bubble.bubble_class(),
        item.style.opacity,
        item.style.offset_y,
    );
    out.push_str(&item.markup);
    out.push_str("</div></li>");
}

fn key_attr(key: ItemKey) -> String {
    match key {
        ItemKey::Message(index) => format!("message-{index}"),
        ItemKey::Pending => "pending".to_string(),
    }
}
