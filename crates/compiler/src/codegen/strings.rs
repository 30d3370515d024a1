//! String intern table
//!
//! Assigns stable labels to `PUSH_STRING` payloads in encounter order
//! (`str_0`, `str_1`, ...). spec.md §4.3 permits deduplicating identical
//! payloads onto one label as an optimization, but notes the reference
//! implementation returns a fresh label per occurrence to preserve
//! positional distinctness; we match the reference behavior so two
//! identical string literals at different call sites never alias.

use super::CodeGen;

impl CodeGen {
    /// Interns `payload` and returns its label. Always assigns a fresh
    /// label, even for a payload seen before.
    pub(super) fn intern_string(&mut self, payload: &str) -> String {
        let label = format!("str_{}", self.string_constants.len());
        self.string_constants.push((label.clone(), payload.to_string()));
        label
    }
}
