//! `MEMORY_LOAD` / `MEMORY_STORE` lowering.
//!
//! The type-checker consumes two values for both (spec.md §9 Open
//! questions, resolved in favor of the looser reference contract). The
//! lowering below is the ARM64 side of that same reference behavior: it
//! addresses through the top slot directly rather than popping a full
//! pointer/length pair.

use super::{CodeGen, CodeGenError};
use super::platform::STACK_SLOT_BYTES;

impl CodeGen {
    pub(super) fn lower_memory_load(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr("ldr X1, [X0]")?;
        self.emit_instr("str X1, [SP]")
    }

    pub(super) fn lower_memory_store(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("ldr X1, [SP]")?;
        self.emit_instr("str X0, [X1]")
    }
}
