//! Tokenizer for HEEx templates: HTML tags, text, comments, and the EEx
//! `<% %>` and `<%= %>` expression tags embedded among them.

use std::fmt;

use crate::language::*;

#[derive(Eq, Debug, PartialEq, Clone)]
pub enum ParsingError {
    UnterminatedExpression(usize),
    UnterminatedTag(usize),
    UnterminatedAttribute(usize),
    UnterminatedComment(usize),
    InvalidTagName(usize),
    ExpressionInsideTag(usize),
}

impl ParsingError {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::UnterminatedExpression(offset) => *offset,
            ParsingError::UnterminatedTag(offset) => *offset,
            ParsingError::UnterminatedAttribute(offset) => *offset,
            ParsingError::UnterminatedComment(offset) => *offset,
            ParsingError::InvalidTagName(offset) => *offset,
            ParsingError::ExpressionInsideTag(offset) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::UnterminatedExpression(_) => "unterminated expression tag".to_string(),
            ParsingError::UnterminatedTag(_) => "unterminated tag".to_string(),
            ParsingError::UnterminatedAttribute(_) => "unterminated attribute value".to_string(),
            ParsingError::UnterminatedComment(_) => "unterminated comment".to_string(),
            ParsingError::InvalidTagName(_) => "invalid tag name".to_string(),
            ParsingError::ExpressionInsideTag(_) => {
                "expression tags are not allowed inside a tag".to_string()
            }
        }
    }

    pub fn details(&self) -> &'static str {
        match self {
            ParsingError::UnterminatedExpression(_) => {
                "An expression tag opened with <% or <%= must be closed with %>."
            }
            ParsingError::UnterminatedTag(_) => {
                "This tag was not closed with > or /> before the end of the input."
            }
            ParsingError::UnterminatedAttribute(_) => {
                "The quoted or braced value of this attribute is never closed."
            }
            ParsingError::UnterminatedComment(_) => {
                "An HTML comment opened with <!-- must be closed with -->."
            }
            ParsingError::InvalidTagName(_) => {
                "A closing tag must be written as </name> with a valid element name."
            }
            ParsingError::ExpressionInsideTag(_) => {
                "Use name={expression} or {expression} to compute attributes rather than <%= %>."
            }
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParsingError {}

/// Where the tokenizer is within the markup, carried across expression
/// tags.
#[derive(Debug, PartialEq, Eq, Clone)]
enum Mode {
    Data,
    Comment,
    Raw(String),
}

/// Split a template into its tokens.
pub fn tokenize(content: &str) -> Result<Vec<Token>, ParsingError> {
    let mut tokenizer = Tokenizer::new(content);
    tokenizer.run()?;
    Ok(tokenizer.tokens)
}

#[derive(Debug)]
struct Tokenizer<'i> {
    original: &'i str,
    source: &'i str,
    offset: usize,
    lines: Vec<usize>,
    mode: Mode,
    tokens: Vec<Token>,
    text: String,
    text_offset: usize,
    comment_offset: Option<usize>,
}

impl<'i> Tokenizer<'i> {
    fn new(content: &'i str) -> Tokenizer<'i> {
        let mut lines = vec![0];
        lines.extend(
            content
                .match_indices('\n')
                .map(|(i, _)| i + 1),
        );

        Tokenizer {
            original: content,
            source: content,
            offset: 0,
            lines,
            mode: Mode::Data,
            tokens: Vec::new(),
            text: String::new(),
            text_offset: 0,
            comment_offset: None,
        }
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn position(&self, offset: usize) -> Position {
        let i = match self
            .lines
            .binary_search(&offset)
        {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.lines[i];
        let column = self.original[start..offset]
            .chars()
            .count();

        Position::new(i + 1, column + 1)
    }

    /// Move the next character of input onto the pending text.
    fn take_char(&mut self) {
        if let Some(c) = self.peek_next_char() {
            self.take_str(c.len_utf8());
        }
    }

    /// Move the given number of bytes of input onto the pending text.
    fn take_str(&mut self, width: usize) {
        if self
            .text
            .is_empty()
        {
            self.text_offset = self.offset;
        }
        self.text
            .push_str(&self.source[..width]);
        self.advance(width);
    }

    fn flush_text(&mut self) {
        if self
            .text
            .is_empty()
        {
            return;
        }

        let content = std::mem::take(&mut self.text);

        let mut context = Vec::new();
        if self.mode == Mode::Comment {
            if self.comment_offset == Some(self.text_offset) {
                context.push(Context::CommentStart);
            }
            if content.ends_with("-->") {
                context.push(Context::CommentEnd);
            }
        }

        let position = self.position(self.text_offset);
        self.tokens
            .push(Token::Text {
                content,
                meta: TextMeta { position, context },
            });
    }

    fn run(&mut self) -> Result<(), ParsingError> {
        while !self.is_finished() {
            if self
                .source
                .starts_with("<%%")
            {
                self.take_str(3);
                continue;
            }

            if self
                .source
                .starts_with("<%")
            {
                self.flush_text();
                self.read_expression()?;
                continue;
            }

            match self
                .mode
                .clone()
            {
                Mode::Data => self.read_data()?,
                Mode::Comment => self.read_comment(),
                Mode::Raw(name) => self.read_raw(&name)?,
            }
        }

        if self.mode == Mode::Comment {
            let offset = self
                .comment_offset
                .unwrap_or(self.offset);
            return Err(ParsingError::UnterminatedComment(offset));
        }

        self.flush_text();
        Ok(())
    }

    fn read_data(&mut self) -> Result<(), ParsingError> {
        if self
            .source
            .starts_with("<!--")
        {
            self.flush_text();
            self.mode = Mode::Comment;
            self.comment_offset = Some(self.offset);
            self.take_str(4);
            return Ok(());
        }

        if self
            .source
            .starts_with("</")
        {
            self.flush_text();
            return self.read_closing_tag();
        }

        if self
            .source
            .starts_with("<!")
        {
            // a declaration such as DOCTYPE is passed along as text
            let end = self
                .source
                .find('>')
                .ok_or(ParsingError::UnterminatedTag(self.offset))?;
            self.take_str(end + 1);
            return Ok(());
        }

        if self
            .source
            .starts_with('<')
            && self.source[1..]
                .starts_with(is_name_start)
        {
            self.flush_text();
            return self.read_opening_tag();
        }

        self.take_char();
        Ok(())
    }

    fn read_comment(&mut self) {
        if self
            .source
            .starts_with("-->")
        {
            self.take_str(3);
            self.flush_text();
            self.mode = Mode::Data;
            self.comment_offset = None;
        } else {
            self.take_char();
        }
    }

    fn read_raw(&mut self, name: &str) -> Result<(), ParsingError> {
        if self
            .source
            .starts_with("</")
        {
            let rest = &self.source[2..];
            let closes = rest
                .get(..name.len())
                .map_or(false, |candidate| candidate.eq_ignore_ascii_case(name))
                && !rest[name.len()..].starts_with(is_name_char);

            if closes {
                self.flush_text();
                self.mode = Mode::Data;
                return self.read_closing_tag();
            }
        }

        self.take_char();
        Ok(())
    }

    fn read_expression(&mut self) -> Result<(), ParsingError> {
        let start = self.offset;
        let render = self
            .source
            .starts_with("<%=");
        let width = if render { 3 } else { 2 };

        let end = self.source[width..]
            .find("%>")
            .ok_or(ParsingError::UnterminatedExpression(start))?;

        let content = self.source[width..width + end].to_string();
        self.advance(width + end + 2);

        let meta = ExprMeta {
            position: self.position(start),
            block: opens_block(&content),
        };

        let token = if render {
            Token::ExprTagRender { content, meta }
        } else {
            Token::ExprTag { content, meta }
        };
        self.tokens
            .push(token);
        Ok(())
    }

    fn read_name(&mut self) -> &'i str {
        let source = self.source;
        let width = source
            .find(|c: char| !is_name_char(c))
            .unwrap_or(source.len());
        let name = &source[..width];
        self.advance(width);
        name
    }

    fn trim_whitespace(&mut self) {
        let width = self
            .source
            .len()
            - self
                .source
                .trim_start()
                .len();
        self.advance(width);
    }

    fn read_closing_tag(&mut self) -> Result<(), ParsingError> {
        let start = self.offset;
        self.advance(2);

        let name = self.read_name();
        if name.is_empty() {
            return Err(ParsingError::InvalidTagName(start));
        }

        self.trim_whitespace();
        if !self
            .source
            .starts_with('>')
        {
            return Err(ParsingError::UnterminatedTag(start));
        }
        self.advance(1);

        self.tokens
            .push(Token::TagClose {
                name: name.to_string(),
                meta: Meta {
                    position: self.position(start),
                },
            });
        Ok(())
    }

    fn read_opening_tag(&mut self) -> Result<(), ParsingError> {
        let start = self.offset;
        self.advance(1);

        let name = self.read_name();
        let mut attributes = Vec::new();
        let self_close;

        loop {
            self.trim_whitespace();

            if self
                .source
                .starts_with("/>")
            {
                self.advance(2);
                self_close = true;
                break;
            }
            if self
                .source
                .starts_with('>')
            {
                self.advance(1);
                self_close = false;
                break;
            }
            if self
                .source
                .starts_with("<%")
            {
                return Err(ParsingError::ExpressionInsideTag(self.offset));
            }

            match self.peek_next_char() {
                None => return Err(ParsingError::UnterminatedTag(start)),
                Some('{') => {
                    let code = self.read_braced()?;
                    attributes.push(Attribute::Root(code));
                }
                Some('/') => {
                    // stray slash not followed by >
                    self.advance(1);
                }
                Some(_) => {
                    let attribute = self.read_attribute(start)?;
                    attributes.push(attribute);
                }
            }
        }

        self.tokens
            .push(Token::TagOpen {
                name: name.to_string(),
                attributes,
                meta: TagMeta {
                    position: self.position(start),
                    self_close,
                },
            });

        if !self_close && is_verbatim(name) {
            self.mode = Mode::Raw(name.to_string());
        }
        Ok(())
    }

    fn read_attribute(&mut self, tag: usize) -> Result<Attribute, ParsingError> {
        let width = self
            .source
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/' || c == '<')
            .unwrap_or(self.source.len());
        if width == 0 {
            return Err(ParsingError::UnterminatedTag(tag));
        }
        let name = self.source[..width].to_string();
        self.advance(width);

        self.trim_whitespace();
        if !self
            .source
            .starts_with('=')
        {
            return Ok(Attribute::Named { name, value: None });
        }
        self.advance(1);
        self.trim_whitespace();

        let value = match self.peek_next_char() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.offset;
                let end = self.source[1..]
                    .find(quote)
                    .ok_or(ParsingError::UnterminatedAttribute(start))?;
                let value = self.source[1..1 + end].to_string();
                self.advance(end + 2);
                AttributeValue::String(value)
            }
            Some('{') => AttributeValue::Expression(self.read_braced()?),
            Some(_) => {
                let width = self
                    .source
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(self.source.len());
                let value = self.source[..width].to_string();
                self.advance(width);
                AttributeValue::Unquoted(value)
            }
            None => return Err(ParsingError::UnterminatedTag(tag)),
        };

        Ok(Attribute::Named {
            name,
            value: Some(value),
        })
    }

    /// Read a `{...}` expression, honouring nested braces and skipping over
    /// quoted strings. Returns the code between the outer braces.
    fn read_braced(&mut self) -> Result<String, ParsingError> {
        let start = self.offset;
        let mut depth = 0;
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for (i, c) in self
            .source
            .char_indices()
        {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let code = self.source[1..i].to_string();
                        self.advance(i + 1);
                        return Ok(code);
                    }
                }
                _ => {}
            }
        }

        Err(ParsingError::UnterminatedAttribute(start))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == ':'
}
