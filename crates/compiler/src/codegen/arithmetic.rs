//! Arithmetic intrinsic lowering: PLUS, MINUS, MULTIPLY, DIVIDE, MODULUS,
//! INCREMENT, DECREMENT.
//!
//! Binary operators all share one shape (spec.md §4.2): pop top into X0,
//! pop next into X1, compute into X0 with the deeper operand (X1) as the
//! left-hand side, then push X0. Only the compute step differs per
//! operator, so it is factored into a single closure-taking helper.

use super::{CodeGen, CodeGenError};

impl CodeGen {
    fn binary_op(
        &mut self,
        compute: impl Fn(&mut CodeGen) -> Result<(), CodeGenError>,
    ) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr("add SP, SP, #16")?;
        self.emit_instr("ldr X1, [SP]")?;
        self.emit_instr("add SP, SP, #16")?;
        compute(self)?;
        self.emit_instr("sub SP, SP, #16")?;
        self.emit_instr("str X0, [SP]")
    }

    pub(super) fn lower_plus(&mut self) -> Result<(), CodeGenError> {
        self.binary_op(|cg| cg.emit_instr("add X0, X1, X0"))
    }

    pub(super) fn lower_minus(&mut self) -> Result<(), CodeGenError> {
        self.binary_op(|cg| cg.emit_instr("sub X0, X1, X0"))
    }

    pub(super) fn lower_multiply(&mut self) -> Result<(), CodeGenError> {
        self.binary_op(|cg| cg.emit_instr("mul X0, X1, X0"))
    }

    pub(super) fn lower_divide(&mut self) -> Result<(), CodeGenError> {
        self.binary_op(|cg| cg.emit_instr("sdiv X0, X1, X0"))
    }

    /// `a - (a udiv b) * b`, computed with `udiv`/`mul`/`sub` (spec.md
    /// §4.2 — ARM64 has no integer remainder instruction).
    pub(super) fn lower_modulus(&mut self) -> Result<(), CodeGenError> {
        self.binary_op(|cg| {
            cg.emit_instr("udiv X2, X1, X0")?;
            cg.emit_instr("mul X2, X2, X0")?;
            cg.emit_instr("sub X0, X1, X2")
        })
    }

    pub(super) fn lower_increment(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr("add X0, X0, #1")?;
        self.emit_instr("str X0, [SP]")
    }

    pub(super) fn lower_decrement(&mut self) -> Result<(), CodeGenError> {
        self.emit_instr("ldr X0, [SP]")?;
        self.emit_instr("sub X0, X0, #1")?;
        self.emit_instr("str X0, [SP]")
    }
}
