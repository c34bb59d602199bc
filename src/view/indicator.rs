/// Supplies the body of the "waiting for a reply" item.
pub trait PendingIndicator {
    fn markup(&self) -> String;
}

/// Three pulsing dots.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatDots;

impl PendingIndicator for ChatDots {
    fn markup(&self) -> String {
        "<div class=\"chat-dots\"><span class=\"dot\"></span><span class=\"dot\"></span><span class=\"dot\"></span></div>"
            .to_string()
    }
}
