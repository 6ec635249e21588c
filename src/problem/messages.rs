use heexfmt::{
    formatting::{self, Passthrough, Render},
    language::*,
    parsing::ParsingError,
};

/// Generate problem and detail messages for parsing errors. Where it helps,
/// the details include a sample of correct markup, laid out by the
/// formatter itself.
pub fn generate_error_message(error: &ParsingError, renderer: &impl Render) -> (String, String) {
    let problem = capitalize(&error.message());

    match error {
        ParsingError::ExpressionInsideTag(_) => {
            let sample = vec![
                Token::TagOpen {
                    name: "div".to_string(),
                    attributes: vec![
                        Attribute::expression("class", "@class"),
                        Attribute::Root("@rest".to_string()),
                    ],
                    meta: TagMeta::default(),
                },
                Token::TagClose {
                    name: "div".to_string(),
                    meta: Meta::default(),
                },
            ];

            (
                problem,
                format!(
                    r#"
{}
Attributes can be computed from an expression, either by name or spread
from a keyword list or map:

{}
                    "#,
                    error.details(),
                    present(&sample, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::UnterminatedComment(_) => {
            let sample = vec![Token::Text {
                content: "<!-- a note to readers -->".to_string(),
                meta: TextMeta {
                    position: Position::default(),
                    context: vec![Context::CommentStart, Context::CommentEnd],
                },
            }];

            (
                problem,
                format!(
                    r#"
{}
For example:

{}
                    "#,
                    error.details(),
                    present(&sample, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        _ => (problem, error.details().to_string()),
    }
}

// Lay out sample tokens the same way the format command would.
fn present(tokens: &[Token], renderer: &impl Render) -> String {
    match formatting::render(renderer, tokens, &Passthrough, &Options::default()) {
        Ok(text) => text
            .trim_end()
            .to_string(),
        Err(_) => String::new(),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .collect(),
        None => String::new(),
    }
}
