//! Function table and program context: the read-only input the parser
//! hands to the type-checker and code generator.

use crate::operator::Operator;
use crate::types::SemanticType;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A function's declared signature, body, and emission flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Ordered input type contract.
    #[serde(default)]
    pub input: Vec<SemanticType>,
    /// Ordered output type contract.
    #[serde(default)]
    pub output: Vec<SemanticType>,
    pub operators: Vec<Operator>,
    /// When true, the code generator never emits a standalone `name:` label
    /// and `ret` for this function (its body is inlined at call sites by an
    /// earlier pass; not re-emitted here).
    #[serde(default)]
    pub emit_inline_body: bool,
    /// When true, this function has no body of its own: it resolves to a
    /// symbol the platform linker provides, and its call sites use the
    /// full-register external calling convention (see
    /// `staq-compiler::codegen::calls`).
    #[serde(default)]
    pub is_externally_defined: bool,
}

impl FunctionRecord {
    pub fn arity_in(&self) -> usize {
        self.input.len()
    }

    pub fn arity_out(&self) -> usize {
        self.output.len()
    }
}

/// The complete, read-only input to a compilation session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramContext {
    /// Operator sequence for the top-level program entry.
    pub operators: Vec<Operator>,
    /// Name -> function record.
    #[serde(default)]
    pub functions: HashMap<String, FunctionRecord>,
    /// Names known only by symbol (no function record): callable, typed as
    /// `(INTEGER) -> (INTEGER)`, resolved by the linker.
    #[serde(default)]
    pub external_functions: HashSet<String>,
}

impl ProgramContext {
    pub fn function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.get(name)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external_functions.contains(name)
    }

    /// True if `name` resolves to either a function record or a bare
    /// external symbol; `CALL` to anything else is an `UnknownCallTarget`.
    pub fn has_callable(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.external_functions.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_call_target_is_neither_function_nor_external() {
        let program = ProgramContext::default();
        assert!(!program.has_callable("missing"));
    }

    #[test]
    fn external_function_set_counts_as_callable() {
        let mut program = ProgramContext::default();
        program.external_functions.insert("write".to_string());
        assert!(program.has_callable("write"));
        assert!(program.is_external("write"));
        assert!(program.function("write").is_none());
    }
}
