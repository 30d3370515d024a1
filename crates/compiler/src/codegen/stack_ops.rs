//! `DROP` / `COPY` / `SWAP` lowering.

use super::{CodeGen, CodeGenError};
use super::platform::STACK_SLOT_BYTES;

impl CodeGen {
    pub(super) fn lower_drop(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))
    }

    pub(super) fn lower_copy(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr("str X0, [SP]")?;
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("str X0, [SP]")
    }

    pub(super) fn lower_swap(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("ldr X1, [SP]")?;
        self.emit_instr("str X0, [SP]")?;
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("str X1, [SP]")
    }
}
