//! Static stack type-checker
//!
//! Simulates the abstract data-stack shape through an operator sequence,
//! enforcing each operator's per-operator type contract from spec.md §4.1.
//! There is no unification and no row polymorphism here: `SemanticType` is a
//! closed three-member enum and every stack slot carries exactly one of
//! them, so the abstract stack is simply a `Vec<SemanticType>`.

use staq_core::{FunctionRecord, Intrinsic, Operator, OperatorKind, ProgramContext, SemanticType};
use std::fmt;

/// The abstract stack: an ordered sequence of semantic types modeling the
/// runtime stack's shape at a single program point. Top of stack is the
/// last element.
pub type AbstractStack = Vec<SemanticType>;

/// One error kind from spec.md §7. Each variant carries exactly the data
/// the spec says it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeError {
    InsufficientOperands {
        operator: String,
        location: String,
        required: usize,
        available: usize,
    },
    InvalidArgumentType {
        operator: String,
        location: String,
        expected: SemanticType,
        actual: SemanticType,
    },
    InvalidPointerArithmetic {
        location: String,
        lower: SemanticType,
        upper: SemanticType,
    },
    InvalidBinaryMathArithmetic {
        location: String,
        lower: SemanticType,
        upper: SemanticType,
    },
    NonEmptyStackAtEnd {
        location: String,
        residual: usize,
    },
    UnknownCallTarget {
        name: String,
        location: String,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::InsufficientOperands {
                operator,
                location,
                required,
                available,
            } => write!(
                f,
                "{location}: {operator} requires {required} operand(s), found {available}"
            ),
            TypeError::InvalidArgumentType {
                operator,
                location,
                expected,
                actual,
            } => write!(
                f,
                "{location}: {operator} expected {expected}, found {actual}"
            ),
            TypeError::InvalidPointerArithmetic {
                location,
                lower,
                upper,
            } => write!(
                f,
                "{location}: pointer arithmetic requires INTEGER on the upper operand, found {lower} and {upper}"
            ),
            TypeError::InvalidBinaryMathArithmetic {
                location,
                lower,
                upper,
            } => write!(
                f,
                "{location}: arithmetic requires two INTEGER operands, found {lower} and {upper}"
            ),
            TypeError::NonEmptyStackAtEnd { location, residual } => write!(
                f,
                "{location}: stack has {residual} residual value(s) at end of program"
            ),
            TypeError::UnknownCallTarget { name, location } => {
                write!(f, "{location}: call to unknown function `{name}`")
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// Human-readable label for an operator, used in error messages
/// (`"INTRINSIC DROP"`, `"CALL foo"`, `"IF"`, ...).
fn operator_label(operator: &Operator) -> String {
    match operator.kind {
        OperatorKind::Intrinsic => {
            let name = operator
                .intrinsic()
                .map(|i| i.to_string())
                .unwrap_or_default();
            format!("INTRINSIC {name}")
        }
        OperatorKind::Call => {
            let name = operator.call_target().unwrap_or("?");
            format!("CALL {name}")
        }
        OperatorKind::PushInteger => "PUSH_INTEGER".to_string(),
        OperatorKind::PushString => "PUSH_STRING".to_string(),
        OperatorKind::If => "IF".to_string(),
        OperatorKind::Do => "DO".to_string(),
        OperatorKind::While => "WHILE".to_string(),
        OperatorKind::End => "END".to_string(),
    }
}

/// Type-checks a single operator sequence (the top-level program, or one
/// function body) against a program's function/external tables.
pub struct TypeChecker<'p> {
    program: &'p ProgramContext,
}

impl<'p> TypeChecker<'p> {
    pub fn new(program: &'p ProgramContext) -> Self {
        TypeChecker { program }
    }

    /// Type-checks the top-level program (must end with an empty stack) and
    /// every non-external, non-inline function body (must end matching its
    /// declared output contract).
    pub fn check_all(&self) -> Result<(), TypeError> {
        let mut stack = AbstractStack::new();
        self.check_sequence(&self.program.operators, &mut stack)?;
        if !stack.is_empty() {
            return Err(TypeError::NonEmptyStackAtEnd {
                location: end_location(&self.program.operators),
                residual: stack.len(),
            });
        }

        for function in self.program.functions.values() {
            if function.is_externally_defined || function.emit_inline_body {
                continue;
            }
            self.check_function(function)?;
        }
        Ok(())
    }

    /// Type-checks one function body: abstract stack starts as the input
    /// contract and must equal the output contract at exit.
    pub fn check_function(&self, function: &FunctionRecord) -> Result<(), TypeError> {
        let mut stack: AbstractStack = function.input.clone();
        self.check_sequence(&function.operators, &mut stack)?;
        if stack != function.output {
            return Err(TypeError::NonEmptyStackAtEnd {
                location: end_location(&function.operators),
                residual: stack.len(),
            });
        }
        Ok(())
    }

    fn check_sequence(
        &self,
        operators: &[Operator],
        stack: &mut AbstractStack,
    ) -> Result<(), TypeError> {
        for operator in operators {
            self.apply(operator, stack)?;
        }
        Ok(())
    }

    /// Pops the top `n` elements, in stack order (index 0 is the deepest of
    /// the popped values, last is the top). Fails fast if the stack is too
    /// shallow — this is the "arity pre-check" spec.md §4.1 requires before
    /// every pop.
    fn pop_n(
        &self,
        stack: &mut AbstractStack,
        n: usize,
        operator: &Operator,
    ) -> Result<Vec<SemanticType>, TypeError> {
        if stack.len() < n {
            return Err(TypeError::InsufficientOperands {
                operator: operator_label(operator),
                location: operator.token.location.clone(),
                required: n,
                available: stack.len(),
            });
        }
        Ok(stack.split_off(stack.len() - n))
    }

    fn expect(
        &self,
        operator: &Operator,
        expected: SemanticType,
        actual: SemanticType,
    ) -> Result<(), TypeError> {
        if actual != expected {
            return Err(TypeError::InvalidArgumentType {
                operator: operator_label(operator),
                location: operator.token.location.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn apply(&self, operator: &Operator, stack: &mut AbstractStack) -> Result<(), TypeError> {
        match operator.kind {
            OperatorKind::PushInteger => {
                let pushed = operator
                    .optimization
                    .as_ref()
                    .and_then(|hints| hints.infer_type_after_optimization)
                    .unwrap_or(SemanticType::Integer);
                stack.push(pushed);
            }
            OperatorKind::PushString => {
                stack.push(SemanticType::Pointer);
                stack.push(SemanticType::Integer);
            }
            OperatorKind::Intrinsic => self.apply_intrinsic(operator, stack)?,
            OperatorKind::If | OperatorKind::Do => {
                let popped = self.pop_n(stack, 1, operator)?;
                self.expect(operator, SemanticType::Boolean, popped[0])?;
            }
            OperatorKind::While | OperatorKind::End => {
                // Control-flow markers only; the abstract stack is untouched.
                // Structural balancing and jumps_to validity are the
                // parser's responsibility (spec.md §4.1).
            }
            OperatorKind::Call => self.apply_call(operator, stack)?,
        }
        Ok(())
    }

    fn apply_intrinsic(&self, operator: &Operator, stack: &mut AbstractStack) -> Result<(), TypeError> {
        let intrinsic = operator
            .intrinsic()
            .expect("OperatorKind::Intrinsic always carries an Intrinsic operand");

        match intrinsic {
            Intrinsic::Drop => {
                self.pop_n(stack, 1, operator)?;
            }
            Intrinsic::Copy => {
                let popped = self.pop_n(stack, 1, operator)?;
                stack.push(popped[0]);
                stack.push(popped[0]);
            }
            Intrinsic::Swap => {
                let popped = self.pop_n(stack, 2, operator)?;
                // popped[0] is the lower (was second-from-top) element,
                // popped[1] is the upper (was top); pushing them back in
                // reverse order swaps their position on the stack.
                stack.push(popped[1]);
                stack.push(popped[0]);
            }
            Intrinsic::Increment | Intrinsic::Decrement => {
                let popped = self.pop_n(stack, 1, operator)?;
                self.expect(operator, SemanticType::Integer, popped[0])?;
                stack.push(SemanticType::Integer);
            }
            _ if intrinsic.is_comparison() => {
                self.pop_n(stack, 2, operator)?;
                stack.push(SemanticType::Boolean);
            }
            Intrinsic::Plus | Intrinsic::Minus => {
                let popped = self.pop_n(stack, 2, operator)?;
                let (lower, upper) = (popped[0], popped[1]);
                if lower == SemanticType::Pointer {
                    if upper != SemanticType::Integer {
                        return Err(TypeError::InvalidPointerArithmetic {
                            location: operator.token.location.clone(),
                            lower,
                            upper,
                        });
                    }
                    stack.push(SemanticType::Pointer);
                } else if upper == SemanticType::Pointer {
                    // Pointer on the upper slot with a non-pointer lower slot is
                    // still pointer arithmetic gone wrong, not a math error: the
                    // rule is asymmetric (POINTER only valid on the lower slot),
                    // so this is InvalidPointerArithmetic, not
                    // InvalidBinaryMathArithmetic (spec.md §7, §8 scenario 4).
                    return Err(TypeError::InvalidPointerArithmetic {
                        location: operator.token.location.clone(),
                        lower,
                        upper,
                    });
                } else if lower == SemanticType::Integer && upper == SemanticType::Integer {
                    stack.push(SemanticType::Integer);
                } else {
                    return Err(TypeError::InvalidBinaryMathArithmetic {
                        location: operator.token.location.clone(),
                        lower,
                        upper,
                    });
                }
            }
            Intrinsic::Multiply | Intrinsic::Divide | Intrinsic::Modulus => {
                let popped = self.pop_n(stack, 2, operator)?;
                let (lower, upper) = (popped[0], popped[1]);
                if lower != SemanticType::Integer || upper != SemanticType::Integer {
                    return Err(TypeError::InvalidBinaryMathArithmetic {
                        location: operator.token.location.clone(),
                        lower,
                        upper,
                    });
                }
                stack.push(SemanticType::Integer);
            }
            // spec.md §9 Open Questions: the reference implementation
            // (gofra/typecheck/type_safety.py) leaves the stricter
            // (POINTER, INTEGER) contract commented out and consumes two
            // generic values instead. We follow the reference behavior;
            // the stricter variant is preserved below for documentation.
            Intrinsic::MemoryStore => {
                self.pop_n(stack, 2, operator)?;
                // self.expect(operator, SemanticType::Pointer, popped[0])?;
                // self.expect(operator, SemanticType::Integer, popped[1])?;
            }
            Intrinsic::MemoryLoad => {
                self.pop_n(stack, 2, operator)?;
                // self.expect(operator, SemanticType::Pointer, popped[0])?;
                // self.expect(operator, SemanticType::Integer, popped[1])?;
                stack.push(SemanticType::Integer);
            }
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
                let injected_count = hints
                    .and_then(|h| h.syscall_injected_args.as_ref())
                    .map(|args| args.iter().filter(|a| a.is_some()).count())
                    .unwrap_or(0);
                // Speculatively push one INTEGER per injected slot before
                // popping the full arity (spec.md §4.1 "Syscall rule").
                for _ in 0..injected_count {
                    stack.push(SemanticType::Integer);
                }
                self.pop_n(stack, arity, operator)?;
                let omit_result = hints.is_some_and(|h| h.syscall_omit_result);
                if !omit_result {
                    stack.push(SemanticType::Integer);
                }
            }
        }
        Ok(())
    }

    fn apply_call(&self, operator: &Operator, stack: &mut AbstractStack) -> Result<(), TypeError> {
        let name = operator
            .call_target()
            .expect("OperatorKind::Call always carries a Function operand");

        if !self.program.has_callable(name) {
            return Err(TypeError::UnknownCallTarget {
                name: name.to_string(),
                location: operator.token.location.clone(),
            });
        }

        if let Some(function) = self.program.function(name) {
            let popped = self.pop_n(stack, function.arity_in(), operator)?;
            for (expected, actual) in function.input.iter().zip(popped.iter()) {
                self.expect(operator, *expected, *actual)?;
            }
            stack.extend(function.output.iter().copied());
            Ok(())
        } else {
            // has_callable already ruled out "neither", so this is the
            // external-symbol case.
            let popped = self.pop_n(stack, 1, operator)?;
            self.expect(operator, SemanticType::Integer, popped[0])?;
            stack.push(SemanticType::Integer);
            Ok(())
        }
    }
}

fn end_location(operators: &[Operator]) -> String {
    operators
        .last()
        .map(|op| op.token.location.clone())
        .unwrap_or_else(|| "<empty>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use staq_core::{FunctionRecord, Operand, OperatorKind, ProgramContext};
    use std::collections::HashMap;

    fn op(kind: OperatorKind, operand: Operand) -> Operator {
        Operator::new(kind, operand, "")
    }

    fn intrinsic(i: Intrinsic) -> Operator {
        op(OperatorKind::Intrinsic, Operand::Intrinsic(i))
    }

    /// Scenario 1: push-add-drop type-checks with an empty final stack.
    #[test]
    fn push_add_drop_type_checks() {
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushInteger, Operand::Integer(2)),
                op(OperatorKind::PushInteger, Operand::Integer(3)),
                intrinsic(Intrinsic::Plus),
                intrinsic(Intrinsic::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        TypeChecker::new(&program).check_all().expect("type-checks");
    }

    /// Scenario 2: string length — push, swap, drop, drop ends empty.
    #[test]
    fn string_length_type_checks() {
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushString, Operand::String("hi".into())),
                intrinsic(Intrinsic::Swap),
                intrinsic(Intrinsic::Drop),
                intrinsic(Intrinsic::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        TypeChecker::new(&program).check_all().expect("type-checks");
    }

    /// Scenario 3: pointer + integer accepted (pointer on the lower slot).
    #[test]
    fn pointer_plus_integer_accepted() {
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushString, Operand::String("x".into())),
                intrinsic(Intrinsic::Drop), // drop the length, leaves POINTER
                op(OperatorKind::PushInteger, Operand::Integer(1)),
                intrinsic(Intrinsic::Plus),
                intrinsic(Intrinsic::Drop),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        TypeChecker::new(&program).check_all().expect("type-checks");
    }

    /// Scenario 4: integer + pointer rejected (pointer on the upper slot).
    #[test]
    fn integer_plus_pointer_rejected() {
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushInteger, Operand::Integer(5)),
                op(OperatorKind::PushString, Operand::String("x".into())),
                intrinsic(Intrinsic::Drop),
                intrinsic(Intrinsic::Plus),
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let err = TypeChecker::new(&program).check_all().unwrap_err();
        assert!(matches!(err, TypeError::InvalidPointerArithmetic { .. }));
    }

    /// Scenario 6: a single residual value is a NonEmptyStackAtEnd error.
    #[test]
    fn non_empty_stack_at_end() {
        let program = ProgramContext {
            operators: vec![op(OperatorKind::PushInteger, Operand::Integer(1))],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let err = TypeChecker::new(&program).check_all().unwrap_err();
        assert_eq!(
            err,
            TypeError::NonEmptyStackAtEnd {
                location: String::new(),
                residual: 1,
            }
        );
    }

    #[test]
    fn empty_program_type_checks_trivially() {
        let program = ProgramContext::default();
        TypeChecker::new(&program).check_all().expect("type-checks");
    }

    #[test]
    fn copy_preserves_boolean_type_on_both_slots() {
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushInteger, Operand::Integer(1)),
                intrinsic(Intrinsic::Equal), // arbitrary bool producer needs 2 operands
            ],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        // Build stack manually instead: push two ints, compare -> BOOLEAN, copy, drop x2.
        let mut stack = AbstractStack::new();
        let checker = TypeChecker::new(&program);
        checker
            .apply(&op(OperatorKind::PushInteger, Operand::Integer(1)), &mut stack)
            .unwrap();
        checker
            .apply(&op(OperatorKind::PushInteger, Operand::Integer(2)), &mut stack)
            .unwrap();
        checker
            .apply(&intrinsic(Intrinsic::Equal), &mut stack)
            .unwrap();
        checker.apply(&intrinsic(Intrinsic::Copy), &mut stack).unwrap();
        assert_eq!(stack, vec![SemanticType::Boolean, SemanticType::Boolean]);
    }

    #[test]
    fn swap_then_swap_is_identity() {
        let mut stack = vec![SemanticType::Integer, SemanticType::Pointer];
        let program = ProgramContext::default();
        let checker = TypeChecker::new(&program);
        checker.apply(&intrinsic(Intrinsic::Swap), &mut stack).unwrap();
        checker.apply(&intrinsic(Intrinsic::Swap), &mut stack).unwrap();
        assert_eq!(stack, vec![SemanticType::Integer, SemanticType::Pointer]);
    }

    #[test]
    fn syscall_fully_injected_and_omitted_touches_nothing() {
        use staq_core::OptimizationHints;
        let mut stack = AbstractStack::new();
        let program = ProgramContext::default();
        let checker = TypeChecker::new(&program);
        let syscall = op(OperatorKind::Intrinsic, Operand::Intrinsic(Intrinsic::Syscall1))
            .with_optimization(OptimizationHints {
                infer_type_after_optimization: None,
                syscall_omit_result: true,
                syscall_injected_args: Some(vec![Some(1), Some(0)]),
            });
        checker.apply(&syscall, &mut stack).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn unknown_call_target_is_reported() {
        let program = ProgramContext {
            operators: vec![op(OperatorKind::Call, Operand::Function("ghost".into()))],
            functions: HashMap::new(),
            external_functions: Default::default(),
        };
        let err = TypeChecker::new(&program).check_all().unwrap_err();
        assert!(matches!(err, TypeError::UnknownCallTarget { .. }));
    }

    #[test]
    fn external_function_call_is_int_to_int() {
        let mut external_functions = std::collections::HashSet::new();
        external_functions.insert("write".to_string());
        let program = ProgramContext {
            operators: vec![
                op(OperatorKind::PushInteger, Operand::Integer(1)),
                op(OperatorKind::Call, Operand::Function("write".into())),
                intrinsic(Intrinsic::Drop),
            ],
            functions: HashMap::new(),
            external_functions,
        };
        TypeChecker::new(&program).check_all().expect("type-checks");
    }

    #[test]
    fn function_body_checks_against_its_own_contract() {
        let mut functions = HashMap::new();
        functions.insert(
            "inc2".to_string(),
            FunctionRecord {
                name: "inc2".to_string(),
                input: vec![SemanticType::Integer],
                output: vec![SemanticType::Integer],
                operators: vec![intrinsic(Intrinsic::Increment), intrinsic(Intrinsic::Increment)],
                emit_inline_body: false,
                is_externally_defined: false,
            },
        );
        let program = ProgramContext {
            operators: vec![],
            functions,
            external_functions: Default::default(),
        };
        TypeChecker::new(&program).check_all().expect("type-checks");
    }
}
