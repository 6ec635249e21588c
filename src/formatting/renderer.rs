//! Renderers for colourizing formatted templates

use owo_colors::OwoColorize;

use crate::formatting::expression::Expressions;
use crate::language::*;

/// Types of content that can be rendered with different styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Neutral, // default
    Indent,
    Newline,
    Tag,
    Attribute,
    Text,
    Comment,
    Expression,
    Verbatim,
    Doctype,
}

/// Trait for different rendering backends (the no-op no-markup one, ANSI
/// escapes for terminal colouring)
pub trait Render {
    /// Render content with the specified type/style
    fn render(&self, content_type: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn render(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}

/// Embellish fragments with ANSI escapes to create syntax highlighting in
/// terminal output.
pub struct Terminal;

impl Render for Terminal {
    fn render(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral => content.to_string(),
            Syntax::Indent => content.to_string(),
            Syntax::Newline => content.to_string(),
            Syntax::Tag => content // entity.name.tag - #3465a4 (blue) bold
                .color(owo_colors::Rgb(52, 101, 164))
                .bold()
                .to_string(),
            Syntax::Attribute => content // entity.other.attribute-name - #8f5902 (brown)
                .color(owo_colors::Rgb(143, 89, 2))
                .to_string(),
            Syntax::Text => content.to_string(),
            Syntax::Comment => content // comment - #999999 (grey)
                .color(owo_colors::Rgb(153, 153, 153))
                .to_string(),
            Syntax::Expression => content // source.embedded - #ad7fa8 (purple) bold
                .color(owo_colors::Rgb(173, 127, 168))
                .bold()
                .to_string(),
            Syntax::Verbatim => content // string.unquoted - #4e9a06 (green)
                .color(owo_colors::Rgb(78, 154, 6))
                .to_string(),
            Syntax::Doctype => content // meta.tag.sgml - #cc0000 (red)
                .color(owo_colors::Rgb(204, 0, 0))
                .to_string(),
        }
    }
}

/// We do the code formatting in two passes. First we fold the token stream
/// into a Vec of "fragments" (Syntax tag, String pairs). Then second we apply
/// the specified renderer to each pair to result in an embellished or plain
/// String.
pub fn render(
    renderer: &impl Render,
    tokens: &[Token],
    expressions: &dyn Expressions,
    options: &Options,
) -> Result<String, FormattingError> {
    // Pass 1: Format tokens to tagged fragments
    let fragments = crate::formatting::formatter::format_with_renderer(tokens, expressions, options)?;

    // Pass 2: Render tagged fragments to final output
    Ok(render_to_string(renderer, fragments))
}

/// Pass 2: apply markup to fragments via render() and combine.
fn render_to_string(renderer: &impl Render, fragments: Vec<(Syntax, String)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.render(syntax, &content);
        output.push_str(&rendered);
    }

    output
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn identity_leaves_content_alone() {
        assert_eq!(Identity.render(Syntax::Tag, "<div>"), "<div>");
        assert_eq!(Identity.render(Syntax::Indent, "    "), "    ");
    }

    #[test]
    fn terminal_colours_markup_but_not_layout() {
        assert_eq!(Terminal.render(Syntax::Indent, "  "), "  ");
        assert_eq!(Terminal.render(Syntax::Newline, "\n"), "\n");

        let tag = Terminal.render(Syntax::Tag, "<div>");
        assert!(tag.contains("<div>"));
        assert!(tag.starts_with('\u{1b}'));
    }

    #[test]
    fn combining_fragments() {
        let fragments = vec![
            (Syntax::Tag, "<p>".to_string()),
            (Syntax::Text, "Hi".to_string()),
            (Syntax::Tag, "</p>".to_string()),
            (Syntax::Newline, "\n".to_string()),
        ];
        assert_eq!(render_to_string(&Identity, fragments), "<p>Hi</p>\n");
    }
}
