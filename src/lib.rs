#[macro_use]
mod regex;

pub mod formatting;
pub mod language;
pub mod parsing;
