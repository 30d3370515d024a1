//! ARM64/Darwin code generator.
//!
//! Lowers a type-checked [`ProgramContext`] into GNU-style ARM64 assembly
//! text targeting Darwin/Mach-O, per spec.md §4.2. Code generation is split
//! into focused submodules, one per operator family, mirroring the
//! reference backend's own per-case structure:
//!
//! - `state.rs`: `CodeGen` (output sink, debug-comment flag, string intern
//!   table) and the line-emission primitives every other submodule builds
//!   on.
//! - `push.rs`: `PUSH_INTEGER` / `PUSH_STRING`
//! - `stack_ops.rs`: `DROP` / `COPY` / `SWAP`
//! - `arithmetic.rs`: `PLUS` / `MINUS` / `MULTIPLY` / `DIVIDE` / `MODULUS` /
//!   `INCREMENT` / `DECREMENT`
//! - `comparisons.rs`: the six comparison intrinsics
//! - `memory.rs`: `MEMORY_LOAD` / `MEMORY_STORE`
//! - `syscalls.rs`: `SYSCALL0`..`SYSCALL6`
//! - `control_flow.rs`: `IF` / `DO` / `WHILE` / `END`
//! - `calls.rs`: `CALL`
//! - `strings.rs`: the string intern table
//! - `platform.rs`: ARM64/Darwin ABI constants
//! - `error.rs`: `CodeGenError`
//!
//! This module ties them together: [`CodeGen::generate`] is the single
//! entry point, and `apply` is the per-operator dispatch every submodule's
//! `lower_*` method is reached through.

mod arithmetic;
mod calls;
mod comparisons;
mod control_flow;
mod error;
mod memory;
mod platform;
mod push;
mod stack_ops;
mod state;
mod strings;
mod syscalls;

pub use error::CodeGenError;
pub use state::CodeGen;

use staq_core::{Operator, OperatorKind, ProgramContext};

impl CodeGen {
    /// Generates the complete assembly text for `program`. Assumes the
    /// program has already been accepted by [`crate::typechecker::TypeChecker`]
    /// (spec.md §5: "the code generator must not run before the
    /// type-checker has accepted the program").
    pub fn generate(program: &ProgramContext, debug_comments: bool) -> Result<String, CodeGenError> {
        let mut codegen = CodeGen::new(debug_comments);
        codegen.emit_debug_header()?;
        codegen.emit_function_declarations(program)?;
        codegen.emit_entry_header()?;
        codegen.emit_sequence(&program.operators, program)?;
        codegen.emit_program_epilogue()?;
        codegen.emit_static_segment()?;
        Ok(codegen.into_output())
    }

    fn emit_debug_header(&mut self) -> Result<(), CodeGenError> {
        if self.debug_comments {
            self.emit_raw("// Assembly generated by the Staq codegen backend")?;
            self.emit_raw("// Target: ARM64, Darwin")?;
            self.emit_raw("")?;
        }
        Ok(())
    }

    /// Emits a standalone label + body + `ret` for every function that is
    /// neither inlined by an earlier pass nor externally defined (spec.md
    /// §4.2 emission structure, step 2).
    ///
    /// Iterates names in sorted order rather than the function table's own
    /// (hash map) order, so that two runs over the same `ProgramContext`
    /// produce byte-identical output (spec.md §8 "Round-trip / idempotence").
    fn emit_function_declarations(&mut self, program: &ProgramContext) -> Result<(), CodeGenError> {
        let mut names: Vec<&String> = program.functions.keys().collect();
        names.sort();
        for name in names {
            let function = &program.functions[name];
            if function.emit_inline_body || function.is_externally_defined {
                continue;
            }
            self.emit_label(name)?;
            self.emit_sequence(&function.operators, program)?;
            self.emit_instr("ret")?;
        }
        Ok(())
    }

    fn emit_entry_header(&mut self) -> Result<(), CodeGenError> {
        self.emit_raw(".global _start")?;
        self.emit_raw(".align 4")?;
        self.emit_raw("")?;
        self.emit_label("_start")
    }

    fn emit_program_epilogue(&mut self) -> Result<(), CodeGenError> {
        self.emit_comment("Program epilogue (exit return-code 0)")?;
        self.emit_instr("mov X0, #0")?;
        self.emit_instr(&format!("mov {}, #{}", platform::SYSCALL_NUMBER_REGISTER, platform::SYS_EXIT))?;
        self.emit_instr("svc #0")
    }

    /// Finalizes the static data segment. Only valid once every
    /// `PUSH_STRING` in the program has been lowered, so the intern table
    /// is closed (spec.md §5).
    fn emit_static_segment(&mut self) -> Result<(), CodeGenError> {
        self.emit_raw(&format!("mem_buffer: .space {}", platform::SCRATCH_BUFFER_BYTES))?;
        for (label, payload) in self.string_constants.clone() {
            self.emit_raw(&format!("{label}: .string \"{payload}\""))?;
        }
        Ok(())
    }

    fn emit_sequence(&mut self, operators: &[Operator], program: &ProgramContext) -> Result<(), CodeGenError> {
        for (index, operator) in operators.iter().enumerate() {
            if self.debug_comments {
                self.emit_operator_comment(operator)?;
            }
            self.apply(index, operator, program)?;
        }
        Ok(())
    }

    fn emit_operator_comment(&mut self, operator: &Operator) -> Result<(), CodeGenError> {
        let mut comment = match operator.kind {
            OperatorKind::Intrinsic => format!(
                "Intrinsic {}",
                operator.intrinsic().map(|i| i.to_string()).unwrap_or_default()
            ),
            OperatorKind::Call => format!("Call {}", operator.call_target().unwrap_or("?")),
            _ => format!("{:?}", operator.kind),
        };
        comment.push_str(&format!(" from {}", operator.token.location));
        if let Some(hints) = &operator.optimization {
            if operator.is_syscall() {
                comment.push_str(&format!(
                    " [optimized, omit result: {}, injected args: {:?}]",
                    hints.syscall_omit_result, hints.syscall_injected_args
                ));
            } else if let Some(inferred) = hints.infer_type_after_optimization {
                comment.push_str(&format!(" [optimized, infer type: {inferred}]"));
            }
        }
        self.emit_comment(&comment)
    }

    /// Per-operator dispatch. `index` is this operator's position within
    /// its own enclosing sequence (top-level program or one function body),
    /// used to derive this operator's own `.ctx_<index>`/`.ctx_<index>_over`
    /// labels when it is a `WHILE`/`END`.
    fn apply(&mut self, index: usize, operator: &Operator, program: &ProgramContext) -> Result<(), CodeGenError> {
        match operator.kind {
            OperatorKind::PushInteger => {
                let value = match &operator.operand {
                    staq_core::Operand::Integer(v) => *v,
                    _ => {
                        return Err(CodeGenError::Logic(
                            "PUSH_INTEGER operator missing its integer operand".to_string(),
                        ));
                    }
                };
                self.lower_push_integer(value)
            }
            OperatorKind::PushString => {
                let payload = match &operator.operand {
                    staq_core::Operand::String(s) => s.clone(),
                    _ => {
                        return Err(CodeGenError::Logic(
                            "PUSH_STRING operator missing its string operand".to_string(),
                        ));
                    }
                };
                self.lower_push_string(&payload)
            }
            OperatorKind::Intrinsic => self.apply_intrinsic(operator),
            OperatorKind::If => {
                let target = operator
                    .jumps_to
                    .ok_or_else(|| CodeGenError::Logic("IF operator missing jumps_to".to_string()))?;
                self.lower_if(target)
            }
            OperatorKind::Do => {
                let target = operator
                    .jumps_to
                    .ok_or_else(|| CodeGenError::Logic("DO operator missing jumps_to".to_string()))?;
                self.lower_do(target)
            }
            OperatorKind::While | OperatorKind::End => self.lower_while_or_end(index, operator.jumps_to),
            OperatorKind::Call => self.apply_call(operator, program),
        }
    }

    fn apply_intrinsic(&mut self, operator: &Operator) -> Result<(), CodeGenError> {
        use staq_core::Intrinsic;

        let intrinsic = operator
            .intrinsic()
            .ok_or_else(|| CodeGenError::Logic("INTRINSIC operator missing its intrinsic operand".to_string()))?;

        match intrinsic {
            Intrinsic::Plus => self.lower_plus(),
            Intrinsic::Minus => self.lower_minus(),
            Intrinsic::Multiply => self.lower_multiply(),
            Intrinsic::Divide => self.lower_divide(),
            Intrinsic::Modulus => self.lower_modulus(),
            Intrinsic::Increment => self.lower_increment(),
            Intrinsic::Decrement => self.lower_decrement(),
            Intrinsic::Equal => self.lower_equal(),
            Intrinsic::NotEqual => self.lower_not_equal(),
            Intrinsic::LessThan => self.lower_less_than(),
            Intrinsic::LessEqualThan => self.lower_less_equal_than(),
            Intrinsic::GreaterThan => self.lower_greater_than(),
            Intrinsic::GreaterEqualThan => self.lower_greater_equal_than(),
            Intrinsic::Drop => self.lower_drop(),
            Intrinsic::Copy => self.lower_copy(),
            Intrinsic::Swap => self.lower_swap(),
            Intrinsic::MemoryLoad => self.lower_memory_load(),
            Intrinsic::MemoryStore => self.lower_memory_store(),
            Intrinsic::Syscall0
            | Intrinsic::Syscall1
            | Intrinsic::Syscall2
            | Intrinsic::Syscall3
            | Intrinsic::Syscall4
            | Intrinsic::Syscall5
            | Intrinsic::Syscall6 => {
                let arity = intrinsic
                    .syscall_arity()
                    .expect("matched arm is always a SYSCALLn intrinsic");
                let hints = operator.optimization.as_ref();
                let injected = hints.and_then(|h| h.syscall_injected_args.as_deref());
                let omit_result = hints.is_some_and(|h| h.syscall_omit_result);
                self.lower_syscall(arity, injected, omit_result)
            }
        }
    }

    fn apply_call(&mut self, operator: &Operator, program: &ProgramContext) -> Result<(), CodeGenError> {
        let name = operator
            .call_target()
            .ok_or_else(|| CodeGenError::Logic("CALL operator missing its function operand".to_string()))?;

        if !program.has_callable(name) {
            return Err(CodeGenError::Logic(format!("call to unknown function `{name}`")));
        }

        if let Some(function) = program.function(name) {
            self.lower_call_function(
                name,
                function.arity_in(),
                function.arity_out(),
                function.is_externally_defined,
            )
        } else {
            // has_callable already ruled out "neither", so this is the
            // external-symbol case.
            self.lower_call_external_symbol(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staq_core::{FunctionRecord, Intrinsic as I, Operand, OperatorKind as K, SemanticType};
    use std::collections::HashMap;

    fn op(kind: K, operand: Operand) -> Operator {
        Operator::new(kind, operand, "")
    }

    fn intrinsic(i: I) -> Operator {
        op(K::Intrinsic, Operand::Intrinsic(i))
    }

    /// Scenario 1: push-add-drop emits two pushes, an add, then one drop.
    #[test]
    fn push_add_drop_emits_expected_shape() {
        let program = ProgramContext {
            operators: vec![
                op(K::PushInteger, Operand::Integer(2)),
                op(K::PushInteger, Operand::Integer(3)),
                intrinsic(I::Plus),
                intrinsic(I::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let out = CodeGen::generate(&program, false).expect("generates");
        assert!(out.contains(".global _start"));
        assert!(out.contains("_start:"));
        assert!(out.contains("mov X0, #2"));
        assert!(out.contains("mov X0, #3"));
        assert!(out.contains("add X0, X1, X0"));
        // The DROP after PLUS is the only remaining bare "add SP, SP, #16".
        assert!(out.contains("add SP, SP, #16"));
        assert!(out.contains("mem_buffer: .space 1000"));
    }

    /// Scenario 5: if/else control flow emits a `.ctx_<target>` label at the
    /// END position and a conditional branch from IF.
    #[test]
    fn if_else_emits_ctx_label_and_branch() {
        let program = ProgramContext {
            operators: vec![
                op(K::PushInteger, Operand::Integer(1)),
                op(K::If, Operand::None).with_jump(3),
                op(K::PushInteger, Operand::Integer(7)),
                op(K::End, Operand::None),
                intrinsic(I::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let out = CodeGen::generate(&program, false).expect("generates");
        assert!(out.contains("bne .ctx_3"));
        assert!(out.contains(".ctx_3:"));
    }

    #[test]
    fn empty_program_emits_entry_epilogue_and_static_segment() {
        let program = ProgramContext::default();
        let out = CodeGen::generate(&program, false).expect("generates");
        assert!(out.contains("_start:"));
        assert!(out.contains("mov X0, #0"));
        assert!(out.contains("mov X16, #1"));
        assert!(out.contains("svc #0"));
        assert!(out.contains("mem_buffer: .space 1000"));
    }

    #[test]
    fn push_string_interns_payload_and_length() {
        let program = ProgramContext {
            operators: vec![op(K::PushString, Operand::String("hi".to_string()))],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let out = CodeGen::generate(&program, false).expect("generates");
        assert!(out.contains("adr X0, str_0"));
        assert!(out.contains("mov X0, #2"));
        assert!(out.contains("str_0: .string \"hi\""));
    }

    #[test]
    fn generation_is_idempotent_without_debug_comments() {
        let program = ProgramContext {
            operators: vec![
                op(K::PushInteger, Operand::Integer(1)),
                op(K::PushInteger, Operand::Integer(2)),
                intrinsic(I::Plus),
                intrinsic(I::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let first = CodeGen::generate(&program, false).expect("generates");
        let second = CodeGen::generate(&program, false).expect("generates");
        assert_eq!(first, second);
    }

    #[test]
    fn function_declaration_emitted_before_entry_and_ends_with_ret() {
        let mut functions = HashMap::new();
        functions.insert(
            "inc2".to_string(),
            FunctionRecord {
                name: "inc2".to_string(),
                input: vec![SemanticType::Integer],
                output: vec![SemanticType::Integer],
                operators: vec![intrinsic(I::Increment), intrinsic(I::Increment)],
                emit_inline_body: false,
                is_externally_defined: false,
            },
        );
        let program = ProgramContext {
            operators: vec![],
            functions,
            external_functions: Default::default(),
        };
        let out = CodeGen::generate(&program, false).expect("generates");
        let decl_pos = out.find("inc2:").expect("declaration emitted");
        let entry_pos = out.find("_start:").expect("entry emitted");
        assert!(decl_pos < entry_pos);
        let ret_pos = out[decl_pos..].find("ret").expect("ret emitted");
        assert!(decl_pos + ret_pos < entry_pos);
    }

    #[test]
    fn unknown_call_target_is_a_structural_error() {
        let program = ProgramContext {
            operators: vec![op(K::Call, Operand::Function("ghost".to_string()))],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let err = CodeGen::generate(&program, false).unwrap_err();
        assert!(matches!(err, CodeGenError::Logic(_)));
    }
}
