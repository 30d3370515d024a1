//! Operator tagged sum: kind, disjoint operand, source token and optional
//! control-flow link and optimization annotations.

use crate::types::SemanticType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of operator kinds the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorKind {
    PushInteger,
    PushString,
    Intrinsic,
    If,
    Do,
    While,
    End,
    Call,
}

/// Built-in word families, grouped by arity and effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intrinsic {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Increment,
    Decrement,
    Equal,
    NotEqual,
    LessThan,
    LessEqualThan,
    GreaterThan,
    GreaterEqualThan,
    Drop,
    Copy,
    Swap,
    MemoryLoad,
    MemoryStore,
    Syscall0,
    Syscall1,
    Syscall2,
    Syscall3,
    Syscall4,
    Syscall5,
    Syscall6,
}

impl Intrinsic {
    /// Arity of a `SYSCALLn` intrinsic, including the syscall number slot.
    /// Returns `None` for non-syscall intrinsics.
    pub fn syscall_arity(self) -> Option<usize> {
        match self {
            Intrinsic::Syscall0 => Some(1),
            Intrinsic::Syscall1 => Some(2),
            Intrinsic::Syscall2 => Some(3),
            Intrinsic::Syscall3 => Some(4),
            Intrinsic::Syscall4 => Some(5),
            Intrinsic::Syscall5 => Some(6),
            Intrinsic::Syscall6 => Some(7),
            _ => None,
        }
    }

    /// True for the six comparison intrinsics, which always produce a single
    /// `BOOLEAN`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Intrinsic::Equal
                | Intrinsic::NotEqual
                | Intrinsic::LessThan
                | Intrinsic::LessEqualThan
                | Intrinsic::GreaterThan
                | Intrinsic::GreaterEqualThan
        )
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intrinsic::Plus => "PLUS",
            Intrinsic::Minus => "MINUS",
            Intrinsic::Multiply => "MULTIPLY",
            Intrinsic::Divide => "DIVIDE",
            Intrinsic::Modulus => "MODULUS",
            Intrinsic::Increment => "INCREMENT",
            Intrinsic::Decrement => "DECREMENT",
            Intrinsic::Equal => "EQUAL",
            Intrinsic::NotEqual => "NOT_EQUAL",
            Intrinsic::LessThan => "LESS_THAN",
            Intrinsic::LessEqualThan => "LESS_EQUAL_THAN",
            Intrinsic::GreaterThan => "GREATER_THAN",
            Intrinsic::GreaterEqualThan => "GREATER_EQUAL_THAN",
            Intrinsic::Drop => "DROP",
            Intrinsic::Copy => "COPY",
            Intrinsic::Swap => "SWAP",
            Intrinsic::MemoryLoad => "MEMORY_LOAD",
            Intrinsic::MemoryStore => "MEMORY_STORE",
            Intrinsic::Syscall0 => "SYSCALL0",
            Intrinsic::Syscall1 => "SYSCALL1",
            Intrinsic::Syscall2 => "SYSCALL2",
            Intrinsic::Syscall3 => "SYSCALL3",
            Intrinsic::Syscall4 => "SYSCALL4",
            Intrinsic::Syscall5 => "SYSCALL5",
            Intrinsic::Syscall6 => "SYSCALL6",
        };
        f.write_str(name)
    }
}

/// The operator's operand, disjoint by `OperatorKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Integer(i64),
    String(String),
    Intrinsic(Intrinsic),
    Function(String),
    /// `IF`/`DO`/`WHILE`/`END` carry no operand of their own; their payload
    /// is the `jumps_to` link on `Operator`.
    None,
}

/// The token an operator was produced from: raw source text plus an opaque
/// location string (e.g. `"main.staq:12:3"`). Lexing/parsing is out of
/// scope here, so the location is carried through verbatim rather than
/// reparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceToken {
    pub text: String,
    pub location: String,
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

/// Optional optimization annotations threaded onto an operator by a pass
/// that runs before the type-checker (syscall argument folding, constant
/// push-type inference). The type-checker and code generator both read
/// these; neither produces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationHints {
    /// Overrides the default `INTEGER` type a `PUSH_INTEGER` would push.
    #[serde(default)]
    pub infer_type_after_optimization: Option<SemanticType>,
    /// If true, a `SYSCALLn`'s return value is not pushed.
    #[serde(default)]
    pub syscall_omit_result: bool,
    /// One entry per syscall argument position (including the syscall
    /// number). `None` means "take from the stack at runtime"; `Some(v)`
    /// means "emit `v` as an immediate, do not pop".
    #[serde(default)]
    pub syscall_injected_args: Option<Vec<Option<i64>>>,
}

/// One unit of the linear intermediate representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub kind: OperatorKind,
    pub operand: Operand,
    pub token: SourceToken,
    /// Index of the jump target within the same operator sequence. Only
    /// meaningful for `IF`, `DO`, `WHILE`, `END` that participate in
    /// structured control flow.
    #[serde(default)]
    pub jumps_to: Option<usize>,
    #[serde(default)]
    pub optimization: Option<OptimizationHints>,
}

impl Operator {
    /// Convenience constructor for operators with no control-flow link or
    /// optimization annotations; used heavily by tests.
    pub fn new(kind: OperatorKind, operand: Operand, text: &str) -> Self {
        Operator {
            kind,
            operand,
            token: SourceToken {
                text: text.to_string(),
                location: String::new(),
            },
            jumps_to: None,
            optimization: None,
        }
    }

    pub fn with_jump(mut self, target: usize) -> Self {
        self.jumps_to = Some(target);
        self
    }

    pub fn with_optimization(mut self, hints: OptimizationHints) -> Self {
        self.optimization = Some(hints);
        self
    }

    /// The intrinsic this operator carries, if `kind == INTRINSIC`.
    pub fn intrinsic(&self) -> Option<Intrinsic> {
        match &self.operand {
            Operand::Intrinsic(i) => Some(*i),
            _ => None,
        }
    }

    /// The callee name, if `kind == CALL`.
    pub fn call_target(&self) -> Option<&str> {
        match &self.operand {
            Operand::Function(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_syscall(&self) -> bool {
        self.intrinsic()
            .is_some_and(|i| i.syscall_arity().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syscall_arity_includes_the_number_slot() {
        assert_eq!(Intrinsic::Syscall0.syscall_arity(), Some(1));
        assert_eq!(Intrinsic::Syscall6.syscall_arity(), Some(7));
        assert_eq!(Intrinsic::Plus.syscall_arity(), None);
    }

    #[test]
    fn comparisons_are_recognized() {
        assert!(Intrinsic::LessEqualThan.is_comparison());
        assert!(!Intrinsic::Plus.is_comparison());
    }

    #[test]
    fn operator_round_trips_through_json() {
        let op = Operator::new(
            OperatorKind::PushInteger,
            Operand::Integer(7),
            "7",
        )
        .with_jump(3);
        let json = serde_json::to_string(&op).expect("serialize");
        let back: Operator = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.jumps_to, Some(3));
        assert_eq!(back.operand, Operand::Integer(7));
    }
}
