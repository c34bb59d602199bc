use std::sync::OnceLock;

use regex::Regex;

use crate::error::MathError;

/// Presentation MathML elements the typesetter is allowed to emit.
const MATHML_ALLOWED_TAGS: &[&str] = &[
    "math", "semantics", "annotation", "mrow", "mi", "mn", "mo", "ms", "mtext", "mspace", "msup",
    "msub", "msubsup", "munder", "mover", "munderover", "mfrac", "msqrt", "mroot", "mtable", "mtr",
    "mlabeledtr", "mtd", "mstyle", "mpadded", "menclose", "merror", "mphantom", "mmultiscripts",
    "mprescripts", "none",
];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<(/?)([^\s/>]*)([^>]*)>").expect("tag regex is valid"))
}

fn attribute_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([^\s=/"']+)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
            .expect("attribute regex is valid")
    })
}

fn is_forbidden_attribute(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.starts_with("on") || matches!(name.as_str(), "href" | "src" | "xlink:href" | "xmlns:xlink")
}

/// Checks typeset output before it reaches the page: every tag must be an
/// allowlisted MathML element and no attribute may carry a handler or a link.
pub(crate) fn check_mathml(markup: &str) -> Result<(), MathError> {
    let mut tags = 0usize;
    for caps in tag_regex().captures_iter(markup) {
        tags += 1;
        let name = caps[2].to_ascii_lowercase();
        if !MATHML_ALLOWED_TAGS.contains(&name.as_str()) {
            return Err(MathError::Rejected(format!("element <{name}>")));
        }
        for attr in attribute_regex().captures_iter(&caps[3]) {
            if is_forbidden_attribute(&attr[1]) {
                return Err(MathError::Rejected(format!("attribute {}", &attr[1])));
            }
        }
    }
    // Every `<` must open a tag the regex saw; anything else is a comment,
    // a declaration or a tag the regex could not close.
    if markup.matches('<').count() != tags {
        return Err(MathError::Rejected("stray markup".to_string()));
    }
    Ok(())
}
