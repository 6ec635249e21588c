//! Rendering of tag attributes and the decision whether they fit on the
//! same line as their tag.

use crate::language::*;

/// How the attributes of an opening tag are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `<name a b c>` on one line
    SameLine,
    /// one attribute per line, indented one step beyond the tag, with the
    /// closing `>` alone on a line of its own
    OnePerLine,
}

/// Render a single attribute as it appears in the output.
pub fn render_attribute(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Root(code) => format!("{{{}}}", code),
        Attribute::Named { name, value } => match value {
            None => name.to_string(),
            Some(AttributeValue::String(value)) => {
                if value.contains('"') {
                    format!("{}='{}'", name, value)
                } else {
                    format!("{}=\"{}\"", name, value)
                }
            }
            Some(AttributeValue::Expression(code)) => format!("{}={{{}}}", name, code),
            Some(AttributeValue::Unquoted(value)) => format!("{}={}", name, value),
        },
    }
}

/// Length the opening tag would occupy if written on a single line: every
/// attribute plus its separating space, the tag name, and the `<` with `>`
/// or ` />` around it.
pub fn same_line_length(name: &str, attributes: &[Attribute], self_close: bool) -> usize {
    let attributes: usize = attributes
        .iter()
        .map(|attribute| {
            render_attribute(attribute)
                .chars()
                .count()
                + 1
        })
        .sum();

    let delimiters = if self_close { 4 } else { 2 };

    attributes
        + name
            .chars()
            .count()
        + delimiters
}

/// A single attribute never wraps, however long it is.
pub fn layout(name: &str, attributes: &[Attribute], self_close: bool, line_length: usize) -> Layout {
    if attributes.len() > 1 && same_line_length(name, attributes, self_close) > line_length {
        Layout::OnePerLine
    } else {
        Layout::SameLine
    }
}
