use std::{fmt, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// Failures raised while rendering. The engine itself is total over a
/// well-formed token stream, so these all originate in the expression
/// formatter and abort the whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingError {
    /// The expression formatter rejected a snippet of embedded code.
    Expression { code: String, message: String },
    /// An external expression formatter could not be run at all.
    Spawn { program: String, message: String },
}

impl fmt::Display for FormattingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattingError::Expression { code, message } => {
                write!(f, "unable to format expression `{}`: {}", code, message)
            }
            FormattingError::Spawn { program, message } => {
                write!(f, "unable to run expression formatter {}: {}", program, message)
            }
        }
    }
}

impl std::error::Error for FormattingError {}
