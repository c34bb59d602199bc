/// TeX token. Control sequences carry their name without the backslash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Command(String),
    Char(char),
    Space,
    Open,
    Close,
    Sup,
    Sub,
    Align,
    Param(u8),
}

pub(crate) fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let Some(&next) = chars.peek() else {
                    tokens.push(Token::Command(String::new()));
                    break;
                };
                if next.is_ascii_alphabetic() {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if !c.is_ascii_alphabetic() {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    // Spaces after a control word are not significant.
                    while chars.peek().is_some_and(|c| c.is_whitespace()) {
                        chars.next();
                    }
                    tokens.push(Token::Command(name));
                } else {
                    chars.next();
                    let name = if next.is_whitespace() { ' ' } else { next };
                    tokens.push(Token::Command(name.to_string()));
                }
            }
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            '^' => tokens.push(Token::Sup),
            '_' => tokens.push(Token::Sub),
            '&' => tokens.push(Token::Align),
            '#' => match chars.peek().and_then(|c| c.to_digit(10)) {
                Some(d @ 1..=9) => {
                    chars.next();
                    tokens.push(Token::Param(d as u8));
                }
                _ => tokens.push(Token::Char('#')),
            },
            '%' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                if tokens.last() != Some(&Token::Space) {
                    tokens.push(Token::Space);
                }
            }
            c => tokens.push(Token::Char(c)),
        }
    }
    tokens
}

/// Writes tokens back out as TeX source. Control words get a trailing space
/// so a following letter cannot merge into the name.
pub(crate) fn to_source(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Command(name) => {
                out.push('\\');
                out.push_str(name);
                if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    out.push(' ');
                }
            }
            Token::Char(c) => out.push(*c),
            Token::Space => out.push(' '),
            Token::Open => out.push('{'),
            Token::Close => out.push('}'),
            Token::Sup => out.push('^'),
            Token::Sub => out.push('_'),
            Token::Align => out.push('&'),
            Token::Param(n) => {
                out.push('#');
                out.push(char::from(b'0' + n));
            }
        }
    }
    out
}

/// Deepest brace nesting in `tokens`.
pub(crate) fn max_depth(tokens: &[Token]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for token in tokens {
        match token {
            Token::Open => {
                depth += 1;
                max = max.max(depth);
            }
            Token::Close => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str) -> Token {
        Token::Command(name.to_string())
    }

    #[test]
    fn control_words_swallow_trailing_space() {
        assert_eq!(
            tokenize(r"\alpha x"),
            vec![cmd("alpha"), Token::Char('x')]
        );
    }

    #[test]
    fn control_symbols_are_single_char() {
        assert_eq!(
            tokenize(r"a\,b\\c\{"),
            vec![
                Token::Char('a'),
                cmd(","),
                Token::Char('b'),
                cmd("\\"),
                Token::Char('c'),
                cmd("{"),
            ]
        );
    }

    #[test]
    fn structural_characters() {
        assert_eq!(
            tokenize("{x}^2_#1&"),
            vec![
                Token::Open,
                Token::Char('x'),
                Token::Close,
                Token::Sup,
                Token::Char('2'),
                Token::Sub,
                Token::Param(1),
                Token::Align,
            ]
        );
    }

    #[test]
    fn comments_and_whitespace_runs() {
        assert_eq!(
            tokenize("a   % ignored\n b"),
            vec![Token::Char('a'), Token::Space, Token::Char('b')]
        );
    }

    #[test]
    fn trailing_backslash() {
        assert_eq!(tokenize("x\\"), vec![Token::Char('x'), cmd("")]);
    }

    #[test]
    fn source_round_trips_through_tokens() {
        let src = r"\frac{a}{b}^2_x \, \alpha x & #1";
        assert_eq!(tokenize(&to_source(&tokenize(src))), tokenize(src));
    }

    #[test]
    fn control_word_keeps_separator() {
        assert_eq!(to_source(&tokenize(r"\mathbb{R}x")), r"\mathbb {R}x");
        assert_eq!(to_source(&[cmd("in"), Token::Char('x')]), r"\in x");
    }

    #[test]
    fn depth_counts_nested_groups() {
        assert_eq!(max_depth(&tokenize("{a{b}}{c}")), 2);
        assert_eq!(max_depth(&tokenize("x")), 0);
    }
}
