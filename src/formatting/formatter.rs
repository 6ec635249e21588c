//! Code formatter for HEEx templates
//!
//! The token stream is folded left to right through a single `State`. Each
//! step consumes the state and hands back the next one; there is no
//! backtracking, so every decision is taken from the current token, the
//! previous significant token, and what the state has recorded so far.

use tracing::trace;

use crate::formatting::attributes::{self, Layout};
use crate::formatting::expression::{self, Expressions};
use crate::formatting::renderer::Syntax;
use crate::language::*;

/// One step of indentation.
pub const INDENT: &str = "  ";

/// Fold the tokens into tagged output fragments, ending with exactly one
/// newline. Fails only if the expression formatter does.
pub fn format_with_renderer(
    tokens: &[Token],
    expressions: &dyn Expressions,
    options: &Options,
) -> Result<Vec<(Syntax, String)>, FormattingError> {
    let engine = Engine {
        expressions,
        options,
    };

    let state = tokens
        .iter()
        .try_fold(State::new(), |state, token| state.step(token, &engine))?;

    Ok(state.finish())
}

/// The collaborators and settings that stay fixed for a whole run.
struct Engine<'a> {
    expressions: &'a dyn Expressions,
    options: &'a Options,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    /// inside an HTML comment whose closing delimiter hasn't arrived yet
    Comment,
    /// inside an element whose content is passed through untouched
    Verbatim(String),
}

/// An element whose closing tag has not been reached yet.
#[derive(Debug)]
struct Element {
    name: String,
    multiline: bool,
}

/// A block opened by an expression tag ending in `do` or `->`.
#[derive(Debug, Default)]
struct Block {
    /// The construct's keyword, recorded once a branch marker has indented
    /// its body an extra step.
    branches: Option<String>,
}

#[derive(Debug)]
struct State<'t> {
    fragments: Vec<(Syntax, String)>,
    indentation: usize,
    mode: Mode,
    previous: Option<&'t Token>,
    elements: Vec<Element>,
    blocks: Vec<Block>,
    blank: bool,
}

impl<'t> State<'t> {
    fn new() -> State<'t> {
        State {
            fragments: Vec::new(),
            indentation: 0,
            mode: Mode::Normal,
            previous: None,
            elements: Vec::new(),
            blocks: Vec::new(),
            blank: false,
        }
    }

    /// Dispatch on the kind of token. The order of the arms matters: comment
    /// text first, then anything at all while content is being passed
    /// through verbatim, then each kind of token in normal mode.
    fn step(self, token: &'t Token, engine: &Engine) -> Result<State<'t>, FormattingError> {
        let mut state = match token {
            Token::Text { content, meta } if !meta.context.is_empty() => self.comment(content, meta),
            Token::Text { content, .. } if self.mode != Mode::Normal => self.passthrough(content),
            Token::ExprTag { content, .. } if self.mode != Mode::Normal => {
                self.passthrough(&format!("<%{}%>", content))
            }
            Token::ExprTagRender { content, .. } if self.mode != Mode::Normal => {
                self.passthrough(&format!("<%={}%>", content))
            }
            Token::TagOpen {
                name,
                attributes,
                meta,
            } => self.open_tag(name, attributes, meta.self_close, engine.options),
            Token::TagClose { name, .. } => self.close_tag(name),
            Token::Text { content, .. } => self.text(content, engine.options),
            Token::ExprTagRender { content, meta } => {
                self.render_expression(content, meta.block, engine)?
            }
            Token::ExprTag { content, meta } => self.expression(content, meta.block),
        };

        trace!(?token, indentation = state.indentation, mode = ?state.mode);

        if token.is_significant() {
            state.previous = Some(token);
        }
        Ok(state)
    }

    fn push(&mut self, syntax: Syntax, content: &str) {
        if content.is_empty() {
            return;
        }
        self.fragments
            .push((syntax, content.to_string()));
    }

    /// Start a new line at the given indentation, preceded by a blank line
    /// if one is pending. Nothing is emitted at the very start of output.
    fn newline(&mut self, indentation: usize) {
        let blank = std::mem::take(&mut self.blank);
        if self
            .fragments
            .is_empty()
        {
            return;
        }

        self.push(Syntax::Newline, if blank { "\n\n" } else { "\n" });
        self.push(Syntax::Indent, &INDENT.repeat(indentation));
    }

    /// Continue on the current line.
    fn inline(&mut self) {
        self.blank = false;
    }

    /// Continue on the current line after a single space.
    fn space(&mut self) {
        self.inline();
        self.push(Syntax::Neutral, " ");
    }

    fn trim_trailing(&mut self) {
        while self
            .fragments
            .last()
            .map_or(false, |(_, content)| {
                content
                    .trim_end()
                    .is_empty()
            })
        {
            self.fragments
                .pop();
        }

        if let Some((_, content)) = self
            .fragments
            .last_mut()
        {
            let width = content
                .trim_end()
                .len();
            content.truncate(width);
        }
    }

    /// Buffer finalizer: drop whatever whitespace trails the output and end
    /// with a single newline.
    fn finish(mut self) -> Vec<(Syntax, String)> {
        self.trim_trailing();
        self.fragments
            .push((Syntax::Newline, "\n".to_string()));
        self.fragments
    }

    fn comment(mut self, content: &str, meta: &TextMeta) -> State<'t> {
        let opens = meta
            .context
            .contains(&Context::CommentStart);
        let closes = meta
            .context
            .contains(&Context::CommentEnd);

        let content = if closes { content.trim_end() } else { content };

        if let Mode::Verbatim(_) = self.mode {
            self.push(Syntax::Verbatim, content);
            return self;
        }

        if opens {
            self.newline(self.indentation);
            self.push(Syntax::Comment, content.trim_start());
        } else {
            self.push(Syntax::Comment, content);
        }

        self.mode = if closes { Mode::Normal } else { Mode::Comment };
        self
    }

    fn passthrough(mut self, content: &str) -> State<'t> {
        self.inline();
        self.push(Syntax::Verbatim, content);
        self
    }

    fn open_tag(
        mut self,
        name: &str,
        attributes: &[Attribute],
        self_close: bool,
        options: &Options,
    ) -> State<'t> {
        let breaks = match self.previous {
            None => false,
            Some(previous) => !previous.is_open_comment(),
        };

        if breaks {
            self.newline(self.indentation);
        } else {
            self.inline();
        }

        let layout = attributes::layout(name, attributes, self_close, options.line_length);

        self.push(Syntax::Tag, &format!("<{}", name));
        match layout {
            Layout::SameLine => {
                for attribute in attributes {
                    self.push(Syntax::Neutral, " ");
                    self.push(Syntax::Attribute, &attributes::render_attribute(attribute));
                }
                self.push(Syntax::Tag, if self_close { " />" } else { ">" });
            }
            Layout::OnePerLine => {
                for attribute in attributes {
                    self.newline(self.indentation + 1);
                    self.push(Syntax::Attribute, &attributes::render_attribute(attribute));
                }
                self.newline(self.indentation);
                self.push(Syntax::Tag, if self_close { "/>" } else { ">" });
            }
        }

        if !self_close && !is_void(name) {
            self.indentation += 1;
            self.elements
                .push(Element {
                    name: name.to_string(),
                    multiline: layout == Layout::OnePerLine,
                });
        }

        self.mode = if !self_close && is_verbatim(name) {
            Mode::Verbatim(name.to_string())
        } else {
            Mode::Normal
        };
        self
    }

    fn close_tag(mut self, name: &str) -> State<'t> {
        let indentation = self
            .indentation
            .saturating_sub(1);

        // forget the matching element and anything left unclosed inside it
        let position = self
            .elements
            .iter()
            .rposition(|element| element.name == name);
        let element = match position {
            Some(i) => self
                .elements
                .drain(i..)
                .next(),
            None => None,
        };

        let verbatim = matches!(&self.mode, Mode::Verbatim(open) if open.eq_ignore_ascii_case(name));

        if verbatim {
            self.trim_trailing();
            self.newline(indentation);
            self.mode = Mode::Normal;
        } else {
            let previous = self.previous;
            let breaks = match previous {
                Some(previous) if previous.is_open_comment() => false,
                Some(previous) if previous.is_comment() => true,
                Some(Token::Text { .. }) => element.map_or(false, |element| element.multiline),
                Some(Token::TagOpen { name: open, .. }) if open == name => false,
                _ => true,
            };

            if breaks {
                self.newline(indentation);
            } else {
                self.inline();
            }
        }

        self.push(Syntax::Tag, &format!("</{}>", name));
        self.indentation = indentation;
        self
    }

    fn text(mut self, content: &str, options: &Options) -> State<'t> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            // keep a deliberate blank line, drop incidental line breaks
            let newlines = content
                .matches('\n')
                .count();
            if newlines >= 2 {
                self.blank = true;
            }
            return self;
        }

        let previous = self.previous;
        match previous {
            Some(Token::ExprTagRender { meta, .. }) if meta.block => {
                self.newline(self.indentation);
                self.push(Syntax::Text, trimmed);
            }
            Some(Token::ExprTagRender { .. }) => {
                self.space();
                self.push(Syntax::Text, trimmed);
            }
            Some(Token::TagOpen { attributes, .. })
                if attributes.is_empty()
                    && trimmed
                        .chars()
                        .count()
                        < options.line_length =>
            {
                self.inline();
                self.push(Syntax::Text, trimmed);
            }
            _ if is_comment_delimiter(content) => {
                let content = content.trim_end();
                let content = if self
                    .fragments
                    .is_empty()
                {
                    content.trim_start()
                } else {
                    content
                };
                self.inline();
                self.push(Syntax::Comment, content);
            }
            _ if is_doctype(content) => {
                self.inline();
                self.push(Syntax::Doctype, trimmed);
            }
            _ => {
                self.newline(self.indentation);
                self.push(Syntax::Text, trimmed);
            }
        }
        self
    }

    fn render_expression(
        mut self,
        content: &str,
        block: bool,
        engine: &Engine,
    ) -> Result<State<'t>, FormattingError> {
        let code = expression::canonicalize(content, engine.expressions, engine.options)?;
        let code = expression::reindent(&code, self.indentation);

        let previous = self.previous;
        match previous {
            None => self.inline(),
            Some(previous) if previous.is_comment() => self.newline(self.indentation),
            Some(Token::Text { .. }) => self.space(),
            Some(_) => self.newline(self.indentation),
        }

        self.push(Syntax::Expression, &wrap("<%=", &code));

        if block {
            self.indentation += 1;
            self.blocks
                .push(Block::default());
        }
        Ok(self)
    }

    fn expression(mut self, content: &str, block: bool) -> State<'t> {
        let code = content.trim();
        let previous = self.previous;
        // the tag that opened a block just before this one, if any
        let opener = match previous {
            Some(Token::ExprTagRender { content: opener, meta }) if meta.block => Some(opener),
            Some(Token::ExprTag { content: opener, .. }) if ends_with_do(opener) => Some(opener),
            _ => None,
        };

        if code.starts_with('#') {
            // an EEx comment stays where it is
            self.newline(self.indentation);
            self.push(Syntax::Comment, &format!("<%{} %>", code));
            return self;
        }

        if is_else(code) {
            let indentation = self
                .indentation
                .saturating_sub(1);
            self.newline(indentation);
        } else if is_end(code) {
            let steps = match self
                .blocks
                .pop()
            {
                Some(Block {
                    branches: Some(_),
                }) => 2,
                _ => 1,
            };
            self.indentation = self
                .indentation
                .saturating_sub(steps);
            self.newline(self.indentation);
        } else if let (true, Some(opener)) = (block && ends_with_arrow(code), opener) {
            // first branch of a multi-branch construct
            let keyword = block_keyword(opener)
                .unwrap_or_default()
                .to_string();

            self.newline(self.indentation);
            self.indentation += 1;
            match self
                .blocks
                .last_mut()
            {
                Some(last) => last.branches = Some(keyword),
                None => self
                    .blocks
                    .push(Block {
                        branches: Some(keyword),
                    }),
            }
        } else if block && ends_with_arrow(code) && self.is_branching() {
            // a later branch sits alongside the first one
            let indentation = self
                .indentation
                .saturating_sub(1);
            self.newline(indentation);
        } else if ends_with_do(code) {
            self.newline(self.indentation);
            self.indentation += 1;
            self.blocks
                .push(Block::default());
        } else {
            let indentation = match previous {
                Some(Token::ExprTag { .. }) | Some(Token::ExprTagRender { .. }) => self.indentation,
                _ => self
                    .indentation
                    .saturating_sub(1),
            };
            self.newline(indentation);
        }

        self.push(Syntax::Expression, &wrap("<%", code));
        self
    }

    fn is_branching(&self) -> bool {
        self.blocks
            .last()
            .map_or(false, |block| {
                block
                    .branches
                    .is_some()
            })
    }
}

fn wrap(open: &str, code: &str) -> String {
    if code.is_empty() {
        format!("{} %>", open)
    } else {
        format!("{} {} %>", open, code)
    }
}
