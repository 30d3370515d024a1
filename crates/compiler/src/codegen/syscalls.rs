//! `SYSCALLn` lowering.
//!
//! Argument position `arity - 1` is the syscall number (`X16`); positions
//! `0..arity-1` map directly onto `X0..X(arity-2)`. Each position is either
//! popped from the data stack or, when the operator carries an injected
//! immediate at that position, moved in directly without touching SP
//! (spec.md §3 "Syscall injected argument").

use super::platform::{STACK_SLOT_BYTES, SYSCALL_NUMBER_REGISTER};
use super::{CodeGen, CodeGenError};

impl CodeGen {
    pub(super) fn lower_syscall(
        &mut self,
        arity: usize,
        injected: Option<&[Option<i64>]>,
        omit_result: bool,
    ) -> Result<(), CodeGenError> {
        let injected_at = |position: usize| injected.and_then(|args| args.get(position).copied().flatten());

        match injected_at(arity - 1) {
            Some(value) => self.emit_instr(&format!("mov {SYSCALL_NUMBER_REGISTER}, #{value}"))?,
            None => {
                self.emit_instr(&format!("ldr {SYSCALL_NUMBER_REGISTER}, [SP]"))?;
                self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
            }
        }

        for register in (0..arity.saturating_sub(1)).rev() {
            match injected_at(register) {
                Some(value) => self.emit_instr(&format!("mov X{register}, #{value}"))?,
                None => {
                    self.emit_instr(&format!("ldr X{register}, [SP]"))?;
                    self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
                }
            }
        }

        self.emit_instr("svc #0")?;

        if !omit_result {
            self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
            self.emit_instr("str X0, [SP]")?;
        }
        Ok(())
    }
}
