//! CodeGen state: output buffer and string intern table.

use std::fmt::Write as _;

use super::CodeGenError;

/// Owns the output sink and string intern table for one codegen session.
/// Not `Send`/shareable across sessions by design — spec.md §5 says a
/// compilation session is single-threaded and owns its own scratch state.
pub struct CodeGen {
    pub(super) output: String,
    pub(super) debug_comments: bool,
    /// Insertion-ordered (label, payload) pairs; see `strings.rs`.
    pub(super) string_constants: Vec<(String, String)>,
}

impl CodeGen {
    pub(super) fn new(debug_comments: bool) -> Self {
        CodeGen {
            output: String::new(),
            debug_comments,
            string_constants: Vec::new(),
        }
    }

    pub(super) fn into_output(self) -> String {
        self.output
    }

    /// Emits a label at column zero.
    pub(super) fn emit_label(&mut self, label: &str) -> Result<(), CodeGenError> {
        writeln!(self.output, "{label}:")?;
        Ok(())
    }

    /// Emits one indented instruction line.
    pub(super) fn emit_instr(&mut self, instr: &str) -> Result<(), CodeGenError> {
        writeln!(self.output, "  {instr}")?;
        Ok(())
    }

    /// Emits a `//`-prefixed debug comment line, only when debug comments
    /// are enabled.
    pub(super) fn emit_comment(&mut self, text: &str) -> Result<(), CodeGenError> {
        if self.debug_comments {
            writeln!(self.output, "  // {text}")?;
        }
        Ok(())
    }

    /// Emits a raw line with no indentation (directives, blank lines).
    pub(super) fn emit_raw(&mut self, line: &str) -> Result<(), CodeGenError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}
