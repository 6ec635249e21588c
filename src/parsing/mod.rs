//! Tokenizer front end for HEEx templates

use std::path::Path;
use tracing::debug;

use crate::language::{LoadingError, Token};

mod tokenizer;

pub use tokenizer::{tokenize, ParsingError};

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that errors can borrow the filename for reporting. A
/// filename of "-" reads standard input.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    let result = if filename.to_str() == Some("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(filename)
    };

    match result {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Tokenize template source, or return the error that stopped it.
pub fn parse(content: &str) -> Result<Vec<Token>, ParsingError> {
    match tokenize(content) {
        Ok(tokens) => {
            debug!(
                "Found {} token{}",
                tokens.len(),
                if tokens.len() == 1 { "" } else { "s" }
            );
            Ok(tokens)
        }
        Err(error) => {
            debug!(?error);
            Err(error)
        }
    }
}

/// Read a token stream that some other tokenizer serialized as JSON.
pub fn decode(content: &str) -> Result<Vec<Token>, serde_json::Error> {
    let tokens: Vec<Token> = serde_json::from_str(content)?;
    debug!("Decoded {} tokens", tokens.len());
    Ok(tokens)
}

/// Serialize a token stream as JSON for handing to other tools.
pub fn encode(tokens: &[Token]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tokens)
}
