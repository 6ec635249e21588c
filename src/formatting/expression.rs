//! Formatting of the code embedded in `<%= %>` tags. The actual formatting
//! of host-language code is delegated to an implementation of Expressions;
//! this module handles the incomplete fragments (a dangling `do` or `->`)
//! that template tags routinely contain.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::language::*;

/// Appended to an expression ending in `do` or `->` so the formatter sees a
/// complete construct, then removed again.
const CLOSING_MARKER: &str = "end";

/// Body given to an anonymous function so that it is not empty.
const PLACEHOLDER: &str = "nil";

/// Canonicalizes a snippet of embedded code. Implementations must be
/// deterministic and idempotent; the template formatter relies on that for
/// its own idempotence.
pub trait Expressions {
    fn format(&self, code: &str, options: &Options) -> Result<String, FormattingError>;
}

/// Leaves the code as written, tidying only its whitespace: surrounding
/// blank space is removed, trailing whitespace is stripped from each line,
/// and continuation lines lose their common indentation.
pub struct Passthrough;

impl Expressions for Passthrough {
    fn format(&self, code: &str, _options: &Options) -> Result<String, FormattingError> {
        let mut lines = code
            .trim()
            .lines()
            .map(str::trim_end);

        let first = match lines.next() {
            Some(first) => first,
            None => return Ok(String::new()),
        };
        let rest: Vec<&str> = lines.collect();

        let mut result = first.to_string();
        for line in dedent(&rest) {
            result.push('\n');
            result.push_str(&line);
        }
        Ok(result)
    }
}

/// Pipes code through an external program, such as a language's own code
/// formatter reading standard input. The configured line length is
/// exported to it as LINE_LENGTH.
pub struct External {
    pub program: String,
    pub args: Vec<String>,
}

impl External {
    pub fn new(command: &str) -> External {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .unwrap_or_default()
            .to_string();
        let args = words
            .map(str::to_string)
            .collect();

        External { program, args }
    }

    fn spawn_error(&self, message: String) -> FormattingError {
        FormattingError::Spawn {
            program: self
                .program
                .clone(),
            message,
        }
    }
}

impl Expressions for External {
    fn format(&self, code: &str, options: &Options) -> Result<String, FormattingError> {
        info!("Formatting expression with {}", self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("LINE_LENGTH", options.line_length.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| self.spawn_error(error.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.spawn_error("standard input unavailable".to_string()))?;

        // Feed stdin from its own thread while the output is drained here, so
        // that neither side blocks on a full pipe. Dropping stdin at the end
        // of the writer closes it.
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(code.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|error| self.spawn_error(error.to_string()))?;

        debug!("Process output: {:?}", output);

        if !output
            .status
            .success()
        {
            return Err(FormattingError::Expression {
                code: code.to_string(),
                message: String::from_utf8_lossy(&output.stderr)
                    .trim()
                    .to_string(),
            });
        }

        match written {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(self.spawn_error(error.to_string())),
            Err(_) => return Err(self.spawn_error("writing standard input failed".to_string())),
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim()
            .to_string())
    }
}

/// Format the code of a rendering expression tag, completing and then
/// re-opening constructs that the tag leaves dangling.
pub fn canonicalize(
    content: &str,
    expressions: &dyn Expressions,
    options: &Options,
) -> Result<String, FormattingError> {
    let code = content.trim();
    if code.is_empty() {
        return Ok(String::new());
    }

    if ends_with_do(code) {
        let complete = format!("{}\n{}", code, CLOSING_MARKER);
        let formatted = expressions.format(&complete, options)?;
        Ok(strip_last_line(&formatted, is_end).to_string())
    } else if ends_with_arrow(code) {
        let complete = format!("{}\n{}\n{}", code, PLACEHOLDER, CLOSING_MARKER);
        let formatted = expressions.format(&complete, options)?;
        let formatted = strip_last_line(&formatted, is_end);
        let formatted = strip_last_line(formatted, |line| line.trim() == PLACEHOLDER);
        Ok(align_continuations(formatted))
    } else {
        let formatted = expressions.format(code, options)?;
        Ok(formatted
            .trim()
            .to_string())
    }
}

/// Put every continuation line of multi-line code at the given indentation,
/// keeping their indentation relative to one another.
pub fn reindent(code: &str, indentation: usize) -> String {
    let prefix = super::formatter::INDENT.repeat(indentation);
    let mut lines = code.lines();

    let mut result = lines
        .next()
        .unwrap_or_default()
        .to_string();

    for line in lines {
        result.push('\n');
        if !line
            .trim()
            .is_empty()
        {
            result.push_str(&prefix);
            result.push_str(line);
        }
    }
    result
}

// Remove the final line if it is the synthetic one we added.
fn strip_last_line(code: &str, predicate: impl Fn(&str) -> bool) -> &str {
    let code = code.trim_end();
    match code.rfind('\n') {
        Some(i) if predicate(&code[i + 1..]) => code[..i].trim_end(),
        _ => code,
    }
}

// The placeholder body pushes a formatter to indent what surrounds it;
// continuation lines go back under the opening column of the construct.
fn align_continuations(code: &str) -> String {
    let mut lines = code.lines();
    let first = lines
        .next()
        .unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    let mut result = first.to_string();
    for line in dedent(&rest) {
        result.push('\n');
        result.push_str(&line);
    }
    result
}

fn dedent(lines: &[&str]) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|line| {
            !line
                .trim()
                .is_empty()
        })
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line
                .trim()
                .is_empty()
            {
                String::new()
            } else {
                let start = line
                    .char_indices()
                    .nth(common)
                    .map_or(line.len(), |(i, _)| i);
                line[start..].to_string()
            }
        })
        .collect()
}

// Counted in characters, not bytes; whitespace need not be ASCII.
fn leading_whitespace(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .count()
}
