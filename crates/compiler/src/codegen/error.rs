//! Code generation error types.

/// Error type for code generation operations.
///
/// Allows proper error propagation with `?` for both logical errors
/// (unknown call target, unimplemented operator kind — spec.md §7's
/// structural errors) and formatting errors from writing to the output
/// sink.
#[derive(Debug)]
pub enum CodeGenError {
    /// A structural error: unknown call target or unimplemented operator
    /// kind. Fatal, with no partial-output recovery (spec.md §4.2
    /// "Failure semantics").
    Logic(String),
    /// A write failure on the output sink.
    Format(std::fmt::Error),
}

impl std::fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeGenError::Logic(s) => write!(f, "{}", s),
            CodeGenError::Format(e) => write!(f, "assembly generation error: {}", e),
        }
    }
}

impl std::error::Error for CodeGenError {}

impl From<std::fmt::Error> for CodeGenError {
    fn from(e: std::fmt::Error) -> Self {
        CodeGenError::Format(e)
    }
}
