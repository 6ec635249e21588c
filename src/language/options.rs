use serde::{Deserialize, Serialize};

/// Line length used when nothing else is configured.
pub const DEFAULT_LINE_LENGTH: usize = 98;

/// Settings consumed by the renderer. The same value is handed untouched to
/// whichever expression formatter is in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Budget for attribute wrapping and for keeping text beside its
    /// opening tag.
    pub line_length: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            line_length: DEFAULT_LINE_LENGTH,
        }
    }
}

impl Options {
    pub fn with_line_length(line_length: usize) -> Options {
        Options { line_length }
    }
}
