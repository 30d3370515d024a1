//! `PUSH_INTEGER` / `PUSH_STRING` lowering.

use super::{CodeGen, CodeGenError};
use super::platform::STACK_SLOT_BYTES;

impl CodeGen {
    pub(super) fn lower_push_integer(&mut self, value: i64) -> Result<(), CodeGenError> {
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr(&format!("mov X0, #{value}"))?;
        self.emit_instr("str X0, [SP]")
    }

    /// Interns the literal's payload, pushes its address, then pushes its
    /// byte length (spec.md §4.2 "PUSH_STRING interns the string's raw
    /// text").
    pub(super) fn lower_push_string(&mut self, payload: &str) -> Result<(), CodeGenError> {
        let label = self.intern_string(payload);
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr(&format!("adr X0, {label}"))?;
        self.emit_instr("str X0, [SP]")?;
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr(&format!("mov X0, #{}", payload.len()))?;
        self.emit_instr("str X0, [SP]")
    }
}
