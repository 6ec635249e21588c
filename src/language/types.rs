//! Types representing the token stream produced from a HEEx template

use serde::{Deserialize, Serialize};

/// Location of the first character of a token in the original source. Both
/// fields are 1-origin, for display to humans.
#[derive(Eq, Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Position {
        Position { line, column }
    }
}

/// Markers a tokenizer attaches to text that is part of an HTML comment.
#[derive(Eq, Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    CommentStart,
    CommentEnd,
}

#[derive(Eq, Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct TagMeta {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub self_close: bool,
}

#[derive(Eq, Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub position: Position,
}

#[derive(Eq, Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct TextMeta {
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<Context>,
}

#[derive(Eq, Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ExprMeta {
    #[serde(default)]
    pub position: Position,
    /// Whether the expression opens a nested body (a trailing `do` or `->`).
    #[serde(default)]
    pub block: bool,
}

#[derive(Eq, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// `name="value"`, stored without the quotes
    String(String),
    /// `name={expr}`, stored without the braces
    Expression(String),
    /// `name=value`, anything else a tokenizer chose to hand over as-is
    Unquoted(String),
}

#[derive(Eq, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Named {
        name: String,
        #[serde(default)]
        value: Option<AttributeValue>,
    },
    /// A spread `{expr}` with no name.
    Root(String),
}

impl Attribute {
    pub fn bare(name: &str) -> Attribute {
        Attribute::Named {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn string(name: &str, value: &str) -> Attribute {
        Attribute::Named {
            name: name.to_string(),
            value: Some(AttributeValue::String(value.to_string())),
        }
    }

    pub fn expression(name: &str, code: &str) -> Attribute {
        Attribute::Named {
            name: name.to_string(),
            value: Some(AttributeValue::Expression(code.to_string())),
        }
    }
}

#[derive(Eq, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    TagOpen {
        name: String,
        #[serde(default)]
        attributes: Vec<Attribute>,
        #[serde(default)]
        meta: TagMeta,
    },
    TagClose {
        name: String,
        #[serde(default)]
        meta: Meta,
    },
    Text {
        content: String,
        #[serde(default)]
        meta: TextMeta,
    },
    /// `<% ... %>`, a fragment whose value is discarded
    ExprTag {
        content: String,
        #[serde(default)]
        meta: ExprMeta,
    },
    /// `<%= ... %>`, an expression whose value is rendered into the output
    ExprTagRender {
        content: String,
        #[serde(default)]
        meta: ExprMeta,
    },
}

impl Token {
    pub fn position(&self) -> Position {
        match self {
            Token::TagOpen { meta, .. } => meta.position,
            Token::TagClose { meta, .. } => meta.position,
            Token::Text { meta, .. } => meta.position,
            Token::ExprTag { meta, .. } => meta.position,
            Token::ExprTagRender { meta, .. } => meta.position,
        }
    }

    /// Blank text carries no content of its own; it never becomes the
    /// "previous token" that context-sensitive decisions look at.
    pub fn is_significant(&self) -> bool {
        match self {
            Token::Text { content, meta } => {
                !meta
                    .context
                    .is_empty()
                    || !content
                        .trim()
                        .is_empty()
            }
            _ => true,
        }
    }

    /// Text that is part of an HTML comment, whether the tokenizer marked
    /// it as such or it simply carries a comment delimiter.
    pub fn is_comment(&self) -> bool {
        match self {
            Token::Text { content, meta } => {
                !meta
                    .context
                    .is_empty()
                    || is_comment_delimiter(content)
            }
            _ => false,
        }
    }

    /// Comment text whose closing delimiter has not been seen yet.
    pub fn is_open_comment(&self) -> bool {
        match self {
            Token::Text { meta, .. } => {
                !meta
                    .context
                    .is_empty()
                    && !meta
                        .context
                        .contains(&Context::CommentEnd)
            }
            _ => false,
        }
    }
}

/// Elements that never have a closing tag or children.
pub const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "param", "command", "keygen",
    "source",
];

/// Elements whose content is passed through unmodified.
pub const VERBATIM_ELEMENTS: [&str; 4] = ["script", "style", "code", "pre"];

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

pub fn is_verbatim(name: &str) -> bool {
    VERBATIM_ELEMENTS
        .iter()
        .any(|verbatim| verbatim.eq_ignore_ascii_case(name))
}

pub fn is_comment_delimiter(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("<!--") || text.ends_with("-->")
}

pub fn is_doctype(text: &str) -> bool {
    text.trim_start()
        .get(..9)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("<!doctype"))
}

/// Expression ends with a `do` keyword, opening a block.
pub fn ends_with_do(code: &str) -> bool {
    let re = regex!(r"(?:^|[\s)\]}])do\s*$");
    re.is_match(code)
}

/// Expression ends with an anonymous function or clause arrow.
pub fn ends_with_arrow(code: &str) -> bool {
    let re = regex!(r"->\s*$");
    re.is_match(code)
}

/// Whether the content of an expression tag opens a nested body.
pub fn opens_block(code: &str) -> bool {
    ends_with_do(code) || ends_with_arrow(code)
}

/// Markers such as `else` that sit between two bodies of the same block.
pub fn is_else(code: &str) -> bool {
    let re = regex!(r"^(?:else|rescue|catch|after)$");
    re.is_match(code.trim())
}

/// The `end` that closes a block, possibly followed by closing punctuation
/// as in `end)`.
pub fn is_end(code: &str) -> bool {
    let re = regex!(r"^end(?:[\s)\]}.,]|$)");
    re.is_match(code.trim())
}

/// The leading keyword of an expression, such as `case` in `case @x do`.
pub fn block_keyword(code: &str) -> Option<&str> {
    let re = regex!(r"^\s*([a-z_][A-Za-z0-9_]*[?!]?)");
    let cap = re.captures(code)?;
    cap.get(1)
        .map(|one| one.as_str())
}
