//! Staq Core: the shared operator/function data model
//!
//! This crate holds the language-agnostic intermediate representation that
//! both the type-checker and the ARM64/Darwin code generator walk: an
//! immutable, linear sequence of [`Operator`]s, a function table keyed by
//! name, and the closed set of [`SemanticType`]s used to model the data
//! stack's shape at compile time.
//!
//! Nothing in this crate parses source text or emits assembly; it is the
//! read-only contract a parser front-end hands to `staq-compiler`.
//!
//! # Modules
//!
//! - `types`: the closed `SemanticType` enum
//! - `operator`: `Operator`, `OperatorKind`, `Intrinsic`, `Operand`,
//!   `SourceToken`, `OptimizationHints`
//! - `program`: `FunctionRecord`, `ProgramContext`

pub mod operator;
pub mod program;
pub mod types;

pub use operator::{Intrinsic, Operand, Operator, OperatorKind, OptimizationHints, SourceToken};
pub use program::{FunctionRecord, ProgramContext};
pub use types::SemanticType;
