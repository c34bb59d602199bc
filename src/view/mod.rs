//! Transcript view: turns a message list into an animated list of bubbles.

mod animation;
mod html;
mod indicator;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::render::Renderer;

pub use animation::{AnimationSpec, Lifecycle, Phase, VisualStyle};
pub use indicator::{ChatDots, PendingIndicator};

/// Role whose messages are laid out as outgoing.
pub const USER_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == USER_ROLE
    }
}

/// One view input. An absent message list means "nothing to show yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub waiting_for_response: bool,
}

/// Position-derived identity of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKey {
    Message(usize),
    Pending,
}

/// Key plus mount generation, so a new item reusing the key of one that is
/// still fading out stays distinct from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId {
    pub key: ItemKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bubble {
    /// Sent by the user: right-aligned, bottom-right corner squared off.
    Outgoing,
    /// Everything else, including the pending indicator.
    Incoming,
}

impl Bubble {
    pub fn for_role(role: &str) -> Self {
        if role == USER_ROLE {
            Bubble::Outgoing
        } else {
            Bubble::Incoming
        }
    }

    pub fn alignment(self) -> Alignment {
        match self {
            Bubble::Outgoing => Alignment::End,
            Bubble::Incoming => Alignment::Start,
        }
    }

    pub fn row_class(self) -> Option<&'static str> {
        match self {
            Bubble::Outgoing => Some("flex w-full items-end justify-end"),
            Bubble::Incoming => None,
        }
    }

    pub fn bubble_class(self) -> &'static str {
        match self {
            Bubble::Outgoing => "bg-primary mb-2 w-fit rounded-xl rounded-br-none px-4 py-3 shadow-sm",
            Bubble::Incoming => "bg-muted/20 mb-2 w-fit rounded-xl rounded-bl-none px-4 py-3 shadow-sm",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualItem {
    pub id: ItemId,
    pub alignment: Alignment,
    pub bubble: Bubble,
    pub markup: String,
    pub phase: Phase,
    pub style: VisualStyle,
}

/// Snapshot of the view. `None` when there is no message list at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualTree {
    list: Option<Vec<VisualItem>>,
}

impl VisualTree {
    pub fn empty() -> Self {
        Self { list: None }
    }

    pub fn is_present(&self) -> bool {
        self.list.is_some()
    }

    pub fn items(&self) -> &[VisualItem] {
        self.list.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

struct ItemState {
    id: ItemId,
    bubble: Bubble,
    /// Source text the markup was rendered from; `None` for the indicator.
    content: Option<String>,
    markup: String,
    lifecycle: Lifecycle,
}

/// Keeps per-item animation state across updates of a transcript.
pub struct TranscriptView<'r> {
    renderer: &'r Renderer,
    indicator: Box<dyn PendingIndicator>,
    spec: AnimationSpec,
    items: Vec<ItemState>,
    next_generation: u64,
    mounted: bool,
    present: bool,
}

impl<'r> TranscriptView<'r> {
    pub fn new(renderer: &'r Renderer, config: &ViewConfig) -> Self {
        Self {
            renderer,
            indicator: Box::new(ChatDots),
            spec: AnimationSpec::from(config),
            items: Vec::new(),
            next_generation: 0,
            mounted: false,
            present: false,
        }
    }

    pub fn with_indicator(mut self, indicator: Box<dyn PendingIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Reconciles item state with `transcript` and returns the tree as of
    /// `now`.
    ///
    /// Items present on the very first update appear without an enter
    /// transition. Later additions enter; removals fade out and are dropped
    /// by [`tick`](Self::tick) once the exit completes.
    pub fn update(&mut self, transcript: &Transcript, now: Instant) -> VisualTree {
        self.tick(now);
        let first_pass = !self.mounted;
        self.mounted = true;

        let Some(messages) = transcript.messages.as_deref() else {
            if !self.items.is_empty() {
                log::debug!("message list absent, dropping {} items", self.items.len());
            }
            self.items.clear();
            self.present = false;
            return VisualTree::empty();
        };
        self.present = true;

        let wanted = |key: ItemKey| match key {
            ItemKey::Message(index) => index < messages.len(),
            ItemKey::Pending => transcript.waiting_for_response,
        };
        for item in &mut self.items {
            if item.lifecycle.phase() != Phase::Exiting && !wanted(item.id.key) {
                log::trace!("item {:?} exiting", item.id);
                item.lifecycle.begin_exit(now, &self.spec);
            }
        }

        for (index, message) in messages.iter().enumerate() {
            self.sync_item(ItemKey::Message(index), Some(message), first_pass, now);
        }
        if transcript.waiting_for_response {
            self.sync_item(ItemKey::Pending, None, first_pass, now);
        }

        self.items.sort_by_key(|item| item.id);
        self.snapshot(now)
    }

    /// Advances animations without new input, dropping finished exits.
    pub fn tick(&mut self, now: Instant) {
        let spec = self.spec;
        self.items.retain_mut(|item| {
            let keep = item.lifecycle.advance(now, &spec);
            if !keep {
                log::trace!("item {:?} removed", item.id);
            }
            keep
        });
    }

    /// The tree as of `now` without reconciling new input.
    pub fn snapshot(&self, now: Instant) -> VisualTree {
        if !self.present {
            return VisualTree::empty();
        }
        let items = self
            .items
            .iter()
            .map(|item| VisualItem {
                id: item.id,
                alignment: item.bubble.alignment(),
                bubble: item.bubble,
                markup: item.markup.clone(),
                phase: item.lifecycle.phase(),
                style: item.lifecycle.style_at(now, &self.spec),
            })
            .collect();
        VisualTree { list: Some(items) }
    }

    /// `true` while any item is entering or exiting.
    pub fn is_animating(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.lifecycle.phase() != Phase::Settled)
    }

    fn sync_item(&mut self, key: ItemKey, message: Option<&Message>, first_pass: bool, now: Instant) {
        let bubble = message.map_or(Bubble::Incoming, |m| Bubble::for_role(&m.role));
        let live = self
            .items
            .iter_mut()
            .find(|item| item.id.key == key && item.lifecycle.phase() != Phase::Exiting);
        if let Some(item) = live {
            item.bubble = bubble;
            if let Some(message) = message {
                if item.content.as_deref() != Some(message.content.as_str()) {
                    item.markup = self.renderer.render(&message.content);
                    item.content = Some(message.content.clone());
                }
            }
            return;
        }

        let id = ItemId {
            key,
            generation: self.next_generation,
        };
        self.next_generation += 1;
        let (content, markup) = match message {
            Some(message) => (
                Some(message.content.clone()),
                self.renderer.render(&message.content),
            ),
            None => (None, self.indicator.markup()),
        };
        let lifecycle = if first_pass {
            Lifecycle::settled(now)
        } else {
            Lifecycle::entering(now)
        };
        log::trace!("item {id:?} mounted ({:?})", lifecycle.phase());
        self.items.push(ItemState {
            id,
            bubble,
            content,
            markup,
            lifecycle,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    fn transcript(messages: &[(&str, &str)], waiting: bool) -> Transcript {
        Transcript {
            messages: Some(
                messages
                    .iter()
                    .map(|(role, content)| Message::new(*role, *content))
                    .collect(),
            ),
            waiting_for_response: waiting,
        }
    }

    fn keys(tree: &VisualTree) -> Vec<ItemKey> {
        tree.items().iter().map(|item| item.id.key).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[rstest]
    #[case("user", Bubble::Outgoing, Alignment::End)]
    #[case("assistant", Bubble::Incoming, Alignment::Start)]
    #[case("system", Bubble::Incoming, Alignment::Start)]
    #[case("User", Bubble::Incoming, Alignment::Start)]
    fn bubble_for_role(#[case] role: &str, #[case] bubble: Bubble, #[case] alignment: Alignment) {
        assert_eq!(Bubble::for_role(role), bubble);
        assert_eq!(Bubble::for_role(role).alignment(), alignment);
    }

    #[test]
    fn user_message_then_pending_indicator() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let tree = view.update(&transcript(&[("user", "hi")], true), Instant::now());

        assert_eq!(keys(&tree), vec![ItemKey::Message(0), ItemKey::Pending]);
        let items = tree.items();
        assert_eq!(items[0].alignment, Alignment::End);
        assert_eq!(items[0].markup, "<p>hi</p>\n");
        assert_eq!(items[1].alignment, Alignment::Start);
        assert_eq!(items[1].markup, ChatDots.markup());
    }

    #[test]
    fn absent_messages_render_nothing() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let now = Instant::now();
        view.update(&transcript(&[("user", "hi")], false), now);

        let tree = view.update(
            &Transcript {
                messages: None,
                waiting_for_response: true,
            },
            now + ms(10),
        );
        assert!(!tree.is_present());
        assert!(tree.is_empty());
        assert!(!view.is_animating());
    }

    #[test]
    fn empty_list_while_waiting_has_only_indicator() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let tree = view.update(&transcript(&[], true), Instant::now());
        assert!(tree.is_present());
        assert_eq!(keys(&tree), vec![ItemKey::Pending]);
    }

    #[test]
    fn first_pass_skips_enter_animation() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let now = Instant::now();
        let tree = view.update(&transcript(&[("user", "a"), ("assistant", "b")], false), now);
        assert!(tree
            .items()
            .iter()
            .all(|item| item.phase == Phase::Settled && item.style == VisualStyle::SETTLED));
        assert!(!view.is_animating());
    }

    #[test]
    fn later_additions_enter_then_settle() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let start = Instant::now();
        view.update(&transcript(&[("user", "a")], false), start);

        let tree = view.update(&transcript(&[("user", "a"), ("assistant", "b")], false), start + ms(1));
        let added = &tree.items()[1];
        assert_eq!(added.phase, Phase::Entering);
        assert_eq!(added.style, VisualStyle::hidden(20.0));
        assert!(view.is_animating());

        view.tick(start + ms(400));
        let tree = view.snapshot(start + ms(400));
        assert_eq!(tree.items()[1].phase, Phase::Settled);
        assert!(!view.is_animating());
    }

    #[test]
    fn pending_exits_then_disappears() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let start = Instant::now();
        view.update(&transcript(&[("user", "q")], true), start);

        let tree = view.update(&transcript(&[("user", "q"), ("assistant", "a")], false), start + ms(10));
        assert_eq!(
            keys(&tree),
            vec![ItemKey::Message(0), ItemKey::Message(1), ItemKey::Pending]
        );
        assert_eq!(tree.items()[2].phase, Phase::Exiting);

        view.tick(start + ms(1_010));
        let tree = view.snapshot(start + ms(1_010));
        assert_eq!(keys(&tree), vec![ItemKey::Message(0), ItemKey::Message(1)]);
    }

    #[test]
    fn reused_position_gets_new_item_while_old_one_exits() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let start = Instant::now();
        view.update(&transcript(&[("user", "a"), ("assistant", "b")], false), start);
        view.update(&transcript(&[("user", "a")], false), start + ms(10));

        let tree = view.update(&transcript(&[("user", "a"), ("assistant", "c")], false), start + ms(20));
        let items = tree.items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].id.key, ItemKey::Message(1));
        assert_eq!(items[1].phase, Phase::Exiting);
        assert_eq!(items[2].id.key, ItemKey::Message(1));
        assert_eq!(items[2].phase, Phase::Entering);
        assert!(items[1].id.generation < items[2].id.generation);
        assert!(items[2].markup.contains('c'));
    }

    #[test]
    fn content_change_updates_markup_in_place() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let start = Instant::now();
        let before = view.update(&transcript(&[("assistant", "par")], false), start);
        let after = view.update(&transcript(&[("assistant", "partial *reply*")], false), start + ms(5));
        assert_eq!(before.items()[0].id, after.items()[0].id);
        assert_eq!(after.items()[0].phase, Phase::Settled);
        assert_eq!(after.items()[0].markup, "<p>partial <em>reply</em></p>\n");
    }

    #[test]
    fn list_reappearing_animates_in() {
        let renderer = Renderer::default();
        let mut view = TranscriptView::new(&renderer, &ViewConfig::default());
        let start = Instant::now();
        view.update(&Transcript::default(), start);
        let tree = view.update(&transcript(&[("user", "a")], false), start + ms(5));
        assert_eq!(tree.items()[0].phase, Phase::Entering);
    }

    #[test]
    fn custom_indicator_is_used() {
        struct Spinner;
        impl PendingIndicator for Spinner {
            fn markup(&self) -> String {
                "<span class=\"spinner\"></span>".to_string()
            }
        }
        let renderer = Renderer::default();
        let mut view =
            TranscriptView::new(&renderer, &ViewConfig::default()).with_indicator(Box::new(Spinner));
        let tree = view.update(&transcript(&[], true), Instant::now());
        assert_eq!(tree.items()[0].markup, "<span class=\"spinner\"></span>");
    }

    #[test]
    fn transcript_deserialises_camel_case() {
        let parsed: Transcript = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"}],"waitingForResponse":true}"#,
        )
        .unwrap();
        assert_eq!(parsed, transcript(&[("user", "hi")], true));

        let empty: Transcript = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.messages, None);
        assert!(!empty.waiting_for_response);

        let null: Transcript = serde_json::from_str(r#"{"messages":null}"#).unwrap();
        assert_eq!(null.messages, None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn role() -> impl Strategy<Value = String> {
            prop_oneof![Just("user".to_string()), Just("assistant".to_string())]
        }

        proptest! {
            #[test]
            fn displayed_order_matches_input(
                lists in proptest::collection::vec(
                    (proptest::collection::vec((role(), "[a-z ]{0,8}"), 0..6), any::<bool>()),
                    1..5,
                )
            ) {
                let renderer = Renderer::global();
                let mut view = TranscriptView::new(renderer, &ViewConfig::default());
                let start = Instant::now();
                for (step, (messages, waiting)) in lists.iter().enumerate() {
                    let input = Transcript {
                        messages: Some(
                            messages
                                .iter()
                                .map(|(role, content)| Message::new(role.clone(), content.clone()))
                                .collect(),
                        ),
                        waiting_for_response: *waiting,
                    };
                    let tree = view.update(&input, start + Duration::from_millis(step as u64 * 50));
                    let live: Vec<ItemKey> = tree
                        .items()
                        .iter()
                        .filter(|item| item.phase != Phase::Exiting)
                        .map(|item| item.id.key)
                        .collect();
                    let mut expected: Vec<ItemKey> =
                        (0..messages.len()).map(ItemKey::Message).collect();
                    if *waiting {
                        expected.push(ItemKey::Pending);
                    }
                    prop_assert_eq!(live, expected);
                    if let Some(last) = tree.items().last() {
                        if *waiting {
                            prop_assert_eq!(last.id.key, ItemKey::Pending);
                        }
                    }
                }
            }
        }
    }
}
