//! Structured control-flow lowering: `IF`, `DO`, `WHILE`, `END`.
//!
//! Labels are derived lazily from operator indices within the enclosing
//! sequence rather than stored anywhere (spec.md §9 design notes), so they
//! never desynchronize from the `jumps_to` links the parser already
//! resolved. `END`/`WHILE` are the only operators that ever define a label;
//! `IF`/`DO` only ever reference one.

use super::platform::STACK_SLOT_BYTES;
use super::{CodeGen, CodeGenError};

/// The label marking the head of the construct rooted at operator `index`.
pub(super) fn ctx_label(index: usize) -> String {
    format!(".ctx_{index}")
}

/// The label marking the position immediately after construct `index`.
pub(super) fn ctx_over_label(index: usize) -> String {
    format!(".ctx_{index}_over")
}

impl CodeGen {
    /// `IF` pops the boolean; if it is not `1`, branches past the
    /// construct to its `END`.
    pub(super) fn lower_if(&mut self, jumps_to: usize) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("cmp X0, #1")?;
        self.emit_instr(&format!("bne {}", ctx_label(jumps_to)))
    }

    /// `DO` pops the boolean; if it is not `1`, branches to the loop exit
    /// (the "over" label of its own `jumps_to` target), not its head.
    pub(super) fn lower_do(&mut self, jumps_to: usize) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("cmp X0, #1")?;
        self.emit_instr(&format!("bne {}", ctx_over_label(jumps_to)))
    }

    /// `WHILE`/`END`: with a `jumps_to` link, loop back unconditionally and
    /// mark the position after the loop; without one, just mark this
    /// operator's own head (an `IF`/`END` pair with no loop).
    pub(super) fn lower_while_or_end(
        &mut self,
        self_index: usize,
        jumps_to: Option<usize>,
    ) -> Result<(), CodeGenError> {
        match jumps_to {
            Some(target) => {
                self.emit_instr(&format!("b {}", ctx_label(target)))?;
                self.emit_label(&ctx_over_label(self_index))
            }
            None => self.emit_label(&ctx_label(self_index)),
        }
    }
}
