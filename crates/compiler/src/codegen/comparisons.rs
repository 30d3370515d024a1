//! Comparison intrinsic lowering: `EQUAL`, `NOT_EQUAL`, `<`, `<=`, `>`, `>=`.
//!
//! spec.md §9 design notes call out that the six comparisons differ only in
//! condition code and operand load order, and ask for one parameterized
//! template rather than six duplicated bodies. `GREATER_THAN`/
//! `GREATER_EQUAL_THAN` load the top-of-stack value into `X0` first; the
//! other four load it into `X1` first (spec.md §4.2's "operand loads are
//! swapped" note) — everything else about the template is identical.

use super::platform::STACK_SLOT_BYTES;
use super::{CodeGen, CodeGenError};

impl CodeGen {
    fn compare(&mut self, condition: &str, top_into_x0: bool) -> Result<(), CodeGenError> {
        if top_into_x0 {
            self.emit_instr("ldr X0, [SP]")?;
            self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
            self.emit_instr("ldr X1, [SP]")?;
            self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        } else {
            self.emit_instr("ldr X1, [SP]")?;
            self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
            self.emit_instr("ldr X0, [SP]")?;
            self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        }
        self.emit_instr("cmp X0, X1")?;
        self.emit_instr(&format!("cset X0, {condition}"))?;
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("str X0, [SP]")
    }

    pub(super) fn lower_equal(&mut self) -> Result<(), CodeGenError> {
        self.compare("eq", false)
    }

    pub(super) fn lower_not_equal(&mut self) -> Result<(), CodeGenError> {
        self.compare("ne", false)
    }

    pub(super) fn lower_less_than(&mut self) -> Result<(), CodeGenError> {
        self.compare("lt", false)
    }

    pub(super) fn lower_less_equal_than(&mut self) -> Result<(), CodeGenError> {
        self.compare("le", false)
    }

    pub(super) fn lower_greater_than(&mut self) -> Result<(), CodeGenError> {
        self.compare("gt", true)
    }

    pub(super) fn lower_greater_equal_than(&mut self) -> Result<(), CodeGenError> {
        self.compare("ge", true)
    }
}
