use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::ast::{Block, ProcedureDecl, Program};
use crate::semantic::GLOBAL_LEVEL;

mod call_stack;
mod error;
mod runtime;

pub use call_stack::{ActivationRecord, CallStack, FrameKind};
pub use error::{EvaluationError, EvaluationResult};
use runtime::InterpreterRuntime;

/// Final variable bindings of the program frame, in first-binding order.
pub type Bindings = IndexMap<String, i64>;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Hard ceiling for `max_call_depth`. Each call recurses on the host stack.
pub const MAX_CALL_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Upper bound on live activation records, program frame included.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// A declared procedure together with the nesting level of its own frame.
#[derive(Debug, Clone, Copy)]
struct Procedure<'p> {
    declaration: &'p ProcedureDecl,
    level: usize,
}

/// AST-walking evaluator.
///
/// Every `evaluate` call builds its own call stack, so one interpreter can
/// run any number of programs.
#[derive(Debug, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an interpreter, clamping `max_call_depth` to [`MAX_CALL_DEPTH`].
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            config: InterpreterConfig {
                max_call_depth: config.max_call_depth.min(MAX_CALL_DEPTH),
            },
        }
    }

    pub fn config(&self) -> InterpreterConfig {
        self.config
    }

    /// Executes `program` and returns the bindings of its outermost frame.
    ///
    /// The program is expected to have passed semantic analysis; reads of
    /// names that are not bound in the current frame still fail cleanly.
    pub fn evaluate(&self, program: &Program) -> EvaluationResult<Bindings> {
        let mut procedures = FxHashMap::default();
        collect_procedures(&program.block, GLOBAL_LEVEL, &mut procedures);

        let mut runtime = InterpreterRuntime {
            procedures: &procedures,
            call_stack: CallStack::new(),
            max_call_depth: self.config.max_call_depth,
        };
        let record = ActivationRecord::new(program.name.as_str(), FrameKind::Program, GLOBAL_LEVEL);
        let record = runtime.run_frame(record, &program.block)?;
        info!(
            program = %program.name,
            bindings = record.members().len(),
            "evaluation finished"
        );
        Ok(record.into_members())
    }
}

/// Registers every procedure declared in `block` or below it. A procedure's
/// frame sits one level below the block that declares it.
fn collect_procedures<'p>(
    block: &'p Block,
    level: usize,
    procedures: &mut FxHashMap<&'p str, Procedure<'p>>,
) {
    for declaration in &block.procedures {
        procedures
            .entry(declaration.name.as_str())
            .or_insert(Procedure {
                declaration,
                level: level + 1,
            });
        collect_procedures(&declaration.block, level + 1, procedures);
    }
}

pub fn evaluate(program: &Program) -> EvaluationResult<Bindings> {
    Interpreter::new().evaluate(program)
}
