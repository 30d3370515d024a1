//! `CALL` lowering.
//!
//! Internal, non-external functions share the data stack directly: the
//! callee's body pops/pushes the same hardware SP as the caller, so a call
//! to one is just `bl <name>` with no register marshalling. External
//! symbols use the platform C ABI instead, so their arguments must be
//! popped into `X0..X(n-1)` before the branch. spec.md §9 Open Questions
//! resolves the two external call paths (a function record flagged
//! `is_externally_defined`, and a bare name known only via the external
//! function set) onto this same full-register convention, driven by the
//! declared input contract — the bare-name case naturally degenerates to
//! the single-register case since its contract is `(INTEGER) -> (INTEGER)`.

use super::platform::STACK_SLOT_BYTES;
use super::{CodeGen, CodeGenError};

impl CodeGen {
    /// Pops `arity` arguments off the data stack into `X(arity-1)..X0`, so
    /// the deepest argument ends up in `X0` (spec.md §4.1 "reversed `f.in`").
    fn load_external_args(&mut self, arity: usize) -> Result<(), CodeGenError> {
        for register in (0..arity).rev() {
            self.emit_instr(&format!("ldr X{register}, [SP]"))?;
            self.emit_instr(&format!("add SP, SP, #{STACK_SLOT_BYTES}"))?;
        }
        Ok(())
    }

    fn push_result(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr(&format!("sub SP, SP, #{STACK_SLOT_BYTES}"))?;
        self.emit_instr("str X0, [SP]")
    }

    /// `CALL` to a function known by its full record.
    pub(super) fn lower_call_function(
        &mut self,
        name: &str,
        input_arity: usize,
        output_arity: usize,
        is_externally_defined: bool,
    ) -> Result<(), CodeGenError> {
        if is_externally_defined {
            self.load_external_args(input_arity)?;
        }
        self.emit_instr(&format!("bl {name}"))?;
        if output_arity > 0 {
            self.push_result()?;
        }
        Ok(())
    }

    /// `CALL` to a bare external symbol (no function record): single
    /// argument, single result, per the `(INTEGER) -> (INTEGER)` contract
    /// spec.md assigns such names.
    pub(super) fn lower_call_external_symbol(&mut self, name: &str) -> Result<(), CodeGenError> {
        self.load_external_args(1)?;
        self.emit_instr(&format!("bl {name}"))?;
        self.push_result()
    }
}
