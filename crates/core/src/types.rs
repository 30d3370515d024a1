//! The closed semantic type lattice used by the abstract stack.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value's compile-time type. Equality is nominal; there is no subtyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    Integer,
    Pointer,
    Boolean,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Integer => "INTEGER",
            SemanticType::Pointer => "POINTER",
            SemanticType::Boolean => "BOOLEAN",
        };
        f.write_str(name)
    }
}
