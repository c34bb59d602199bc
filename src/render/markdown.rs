use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::highlight::CodeBlockFormatter;
use super::math::MathTypesetter;
use crate::config::MarkdownConfig;

/// Builds parser options from config. Math recognition is always on.
pub fn parser_options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_MATH);
    if config.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }
    if config.smart_punctuation {
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
    }
    options
}

/// Runs the full markdown pass over `input`, delegating fenced code to
/// `formatter` and `$`/`$$` spans to `math`.
pub fn render_markdown(
    input: &str,
    options: Options,
    formatter: &dyn CodeBlockFormatter,
    math: &MathTypesetter,
) -> String {
    let mut events = Vec::new();
    let mut code: Option<CodeBuffer<'_>> = None;
    let mut html_block: Option<String> = None;
    // Nesting depth inside a link or image whose source is emitted verbatim.
    let mut literal_depth = 0usize;

    for (event, range) in Parser::new_ext(input, options).into_offset_iter() {
        if code.is_some() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(buffer) = code.take() {
                        buffer.finish(formatter, &mut events);
                    }
                }
                Event::Text(text) => {
                    if let Some(buffer) = code.as_mut() {
                        buffer.text.push_str(&text);
                    }
                }
                other => log::trace!("unexpected event in code block: {other:?}"),
            }
            continue;
        }

        if html_block.is_some() {
            match event {
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(raw) = html_block.take() {
                        let markup = render_html_block(&raw, options, formatter, math);
                        events.push(Event::Html(CowStr::from(markup)));
                    }
                }
                Event::Html(text) | Event::Text(text) => {
                    if let Some(raw) = html_block.as_mut() {
                        raw.push_str(&text);
                    }
                }
                other => log::trace!("unexpected event in html block: {other:?}"),
            }
            continue;
        }

        if literal_depth > 0 {
            match event {
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => literal_depth += 1,
                Event::End(TagEnd::Link | TagEnd::Image) => literal_depth -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code = Some(CodeBuffer {
                    kind,
                    text: String::new(),
                });
            }
            Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::InlineMath(src) => {
                events.push(Event::InlineHtml(CowStr::from(math.typeset(&src, false))))
            }
            Event::DisplayMath(src) => {
                events.push(Event::InlineHtml(CowStr::from(math.typeset(&src, true))))
            }
            Event::Start(
                Tag::Link { ref dest_url, .. } | Tag::Image { ref dest_url, .. },
            ) if !is_safe_url(dest_url) => {
                log::debug!("unsafe link destination, emitting source text");
                events.push(Event::Text(CowStr::Borrowed(&input[range])));
                literal_depth = 1;
            }
            other => events.push(other),
        }
    }

    // Unterminated fence at end of input.
    if let Some(buffer) = code.take() {
        buffer.finish(formatter, &mut events);
    }

    let mut out = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Renders the content of a raw HTML block as markdown, with its tags
/// turned into visible text.
fn render_html_block(
    raw: &str,
    options: Options,
    formatter: &dyn CodeBlockFormatter,
    math: &MathTypesetter,
) -> String {
    // No `<` survives, so the nested pass cannot open another HTML block.
    let escaped = raw.replace('<', "&lt;").replace('>', "&gt;");
    render_markdown(&escaped, options, formatter, math)
}

struct CodeBuffer<'a> {
    kind: CodeBlockKind<'a>,
    text: String,
}

impl<'a> CodeBuffer<'a> {
    fn finish(self, formatter: &dyn CodeBlockFormatter, events: &mut Vec<Event<'a>>) {
        let lang = match &self.kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
            CodeBlockKind::Indented => None,
        };
        if let Some(markup) = formatter.format(&self.text, lang.as_deref()) {
            events.push(Event::Html(CowStr::from(markup)));
            return;
        }
        events.push(Event::Start(Tag::CodeBlock(self.kind)));
        events.push(Event::Text(CowStr::from(self.text)));
        events.push(Event::End(TagEnd::CodeBlock));
    }
}

/// Rejects script-capable URL schemes. Relative URLs and ordinary schemes
/// pass; `data:` is only allowed for common raster images.
pub fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    const BLOCKED: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];
    const ALLOWED_DATA: [&str; 4] = [
        "data:image/gif;",
        "data:image/png;",
        "data:image/jpeg;",
        "data:image/webp;",
    ];
    if ALLOWED_DATA.iter().any(|prefix| normalized.starts_with(prefix)) {
        return true;
    }
    !BLOCKED.iter().any(|scheme| normalized.starts_with(scheme))
}
