//! Code formatter for HEEx templates

mod attributes;
mod expression;
pub mod formatter;
mod renderer;

pub use attributes::{layout, render_attribute, same_line_length, Layout};
pub use expression::{canonicalize, reindent, Expressions, External, Passthrough};
pub use formatter::{format_with_renderer, INDENT};
pub use renderer::{render, Identity, Render, Syntax, Terminal};

use crate::language::{FormattingError, Options, Token};

/// Format a token stream to plain text, leaving embedded code as written
/// apart from its whitespace.
pub fn format(tokens: &[Token], options: &Options) -> Result<String, FormattingError> {
    render(&Identity, tokens, &Passthrough, options)
}
