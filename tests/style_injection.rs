use std::time::Instant;

use chatlog::config::ViewConfig;
use chatlog::render::{CUSTOM_STRONG_RULE, STYLE_INJECTOR};
use chatlog::{Document, Renderer, Transcript, TranscriptView};

// Only test in this binary, so the process-wide injector starts unset.
#[test]
fn global_injector_inserts_rule_once_per_process() {
    assert!(!STYLE_INJECTOR.is_injected());

    let renderer = Renderer::global();
    let mut doc = Document::new();
    for content in ["**a**", "```python\nprint('x')\n```", "$x^2$"] {
        renderer.render_into(content, &mut doc);
    }
    assert_eq!(doc.style_rules(), &[CUSTOM_STRONG_RULE.to_string()]);

    let transcript: Transcript = serde_json::from_value(serde_json::json!({
        "messages": [
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "`code`" }
        ],
        "waitingForResponse": true
    }))
    .unwrap();
    let mut view = TranscriptView::new(renderer, &ViewConfig::default());
    let tree = view.update(&transcript, Instant::now());
    tree.mount_into(&mut doc);
    tree.mount_into(&mut doc);

    assert_eq!(doc.style_rules().len(), 1);
    assert!(STYLE_INJECTOR.is_injected());
    assert!(doc.to_page("chat").contains(CUSTOM_STRONG_RULE));
}
