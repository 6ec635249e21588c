// Types representing a stream of HEEx template tokens

mod error;
mod options;
mod types;

// Re-export all public symbols
pub use error::*;
pub use options::*;
pub use types::*;
