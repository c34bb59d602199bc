use std::collections::{BTreeMap, HashMap, VecDeque};

use super::lexer::{tokenize, Token};
use crate::error::MathError;

/// Upper bound on macro expansions per expression.
pub(crate) const MAX_EXPANSIONS: usize = 1_000;

#[derive(Debug, Clone)]
struct Macro {
    params: u8,
    body: Vec<Token>,
}

/// User-defined TeX macros, keyed by name without the backslash.
#[derive(Debug, Clone, Default)]
pub(crate) struct MacroTable {
    macros: HashMap<String, Macro>,
}

impl MacroTable {
    /// Builds the table from `"\\name" -> "body"` pairs. Entries whose key is
    /// not a single control sequence are skipped.
    pub(crate) fn from_config(defs: &BTreeMap<String, String>) -> Self {
        let mut macros = HashMap::new();
        for (key, body) in defs {
            let name = match tokenize(key).as_slice() {
                [Token::Command(name)] if !name.is_empty() => name.clone(),
                _ => {
                    log::debug!("ignoring math macro with invalid name {key:?}");
                    continue;
                }
            };
            let body = tokenize(body);
            let params = body
                .iter()
                .filter_map(|t| match t {
                    Token::Param(n) => Some(*n),
                    _ => None,
                })
                .max()
                .unwrap_or(0);
            macros.insert(name, Macro { params, body });
        }
        Self { macros }
    }

    pub(crate) fn len(&self) -> usize {
        self.macros.len()
    }

    /// Expands every macro use in `tokens`, including uses produced by other
    /// expansions.
    pub(crate) fn expand(&self, tokens: Vec<Token>) -> Result<Vec<Token>, MathError> {
        if self.macros.is_empty() {
            return Ok(tokens);
        }
        let mut input: VecDeque<Token> = tokens.into();
        let mut output = Vec::with_capacity(input.len());
        let mut expansions = 0usize;

        while let Some(token) = input.pop_front() {
            let Token::Command(name) = &token else {
                output.push(token);
                continue;
            };
            let Some(def) = self.macros.get(name) else {
                output.push(token);
                continue;
            };
            expansions += 1;
            if expansions > MAX_EXPANSIONS {
                return Err(MathError::MacroLimit(name.clone()));
            }
            let mut args = Vec::with_capacity(def.params as usize);
            for _ in 0..def.params {
                args.push(take_argument(&mut input, name)?);
            }
            let mut replacement = Vec::with_capacity(def.body.len());
            for t in &def.body {
                match t {
                    Token::Param(n) => {
                        if let Some(arg) = args.get(usize::from(*n) - 1) {
                            replacement.extend(arg.iter().cloned());
                        }
                    }
                    other => replacement.push(other.clone()),
                }
            }
            for t in replacement.into_iter().rev() {
                input.push_front(t);
            }
        }
        Ok(output)
    }
}

/// Takes one macro argument: a braced group (without its braces) or a single
/// token.
fn take_argument(input: &mut VecDeque<Token>, name: &str) -> Result<Vec<Token>, MathError> {
    while input.front() == Some(&Token::Space) {
        input.pop_front();
    }
    match input.pop_front() {
        Some(Token::Open) => {
            let mut depth = 1usize;
            let mut arg = Vec::new();
            while let Some(t) = input.pop_front() {
                match t {
                    Token::Open => depth += 1,
                    Token::Close => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(arg);
                        }
                    }
                    _ => {}
                }
                arg.push(t);
            }
            Err(MathError::UnclosedGroup)
        }
        Some(Token::Close) | None => Err(MathError::MissingArgument(name.to_string())),
        Some(t) => Ok(vec![t]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> MacroTable {
        let defs = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MacroTable::from_config(&defs)
    }

    #[test]
    fn expands_simple_macro() {
        let macros = table(&[("\\RR", "\\mathbb{R}")]);
        assert_eq!(
            macros.expand(tokenize(r"x\in\RR")).unwrap(),
            tokenize(r"x\in\mathbb{R}")
        );
    }

    #[test]
    fn substitutes_parameters() {
        let macros = table(&[("\\pair", "(#1, #2)")]);
        assert_eq!(
            macros.expand(tokenize(r"\pair{a}b")).unwrap(),
            tokenize("(a, b)")
        );
    }

    #[test]
    fn nested_macros_expand() {
        let macros = table(&[("\\RR", "\\mathbb{R}"), ("\\RRn", "\\RR^n")]);
        assert_eq!(
            macros.expand(tokenize(r"\RRn")).unwrap(),
            tokenize(r"\mathbb{R}^n")
        );
    }

    #[test]
    fn runaway_macro_hits_limit() {
        let macros = table(&[("\\loop", "x\\loop")]);
        assert_eq!(
            macros.expand(tokenize(r"\loop")),
            Err(MathError::MacroLimit("loop".to_string()))
        );
    }

    #[test]
    fn missing_argument_is_reported() {
        let macros = table(&[("\\f", "f(#1)")]);
        assert_eq!(
            macros.expand(tokenize(r"\f")),
            Err(MathError::MissingArgument("f".to_string()))
        );
    }

    #[test]
    fn invalid_names_are_skipped() {
        let macros = table(&[("RR", "x"), ("\\ok", "y")]);
        assert_eq!(macros.len(), 1);
    }
}
