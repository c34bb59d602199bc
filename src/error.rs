use thiserror::Error;

/// Failure while highlighting a single fenced code block.
///
/// Never reaches callers of the renderer: the block falls back to plain,
/// escaped output.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The syntax engine rejected a line of the block
    #[error("syntax highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// Failure while typesetting a single math expression.
///
/// Scoped to the offending expression; the rest of the message still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A macro argument group was never closed
    #[error("unclosed group")]
    UnclosedGroup,
    /// A macro needed an argument that was not there
    #[error("missing argument for \\{0}")]
    MissingArgument(String),
    /// Macro expansion did not terminate within the expansion budget
    #[error("macro expansion limit reached while expanding \\{0}")]
    MacroLimit(String),
    /// Groups nested deeper than the typesetter accepts
    #[error("expression nested too deeply")]
    TooDeep,
    /// The TeX parser rejected the expression
    #[error("invalid TeX: {0}")]
    Syntax(String),
    /// Writing MathML failed
    #[error("failed to write MathML: {0}")]
    Render(String),
    /// Typeset output contained an element or attribute outside the MathML allowlist
    #[error("typeset output rejected: {0}")]
    Rejected(String),
}

/// Returned by [`crate::Renderer::install`] when the process-wide renderer
/// has already been initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rendering configuration is already installed")]
pub struct AlreadyInstalled;
