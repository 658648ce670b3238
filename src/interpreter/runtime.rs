use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ast::{BinaryOperator, Block, Compound, Expression, Statement, UnaryOperator};
use crate::token::Span;

use super::call_stack::{ActivationRecord, CallStack, FrameKind};
use super::error::{EvaluationError, EvaluationResult};
use super::Procedure;

/// Runtime executor for statements and expressions of one evaluation.
pub(super) struct InterpreterRuntime<'p> {
    pub(super) procedures: &'p FxHashMap<&'p str, Procedure<'p>>,
    pub(super) call_stack: CallStack,
    pub(super) max_call_depth: usize,
}

impl<'p> InterpreterRuntime<'p> {
    /// Runs `block` inside a freshly pushed frame and returns that frame once
    /// it has been popped again.
    pub(super) fn run_frame(
        &mut self,
        record: ActivationRecord,
        block: &Block,
    ) -> EvaluationResult<ActivationRecord> {
        debug!(frame = record.name(), level = record.level(), kind = %record.kind(), "enter");
        self.call_stack.push(record);
        self.exec_block(block)?;
        let record = self
            .call_stack
            .pop()
            .ok_or(EvaluationError::InvariantViolation {
                message: "frame popped twice",
            })?;
        debug!("leave {record}");
        Ok(record)
    }

    fn exec_block(&mut self, block: &Block) -> EvaluationResult<()> {
        for declaration in &block.declarations {
            self.current_frame_mut()?
                .set(declaration.variable.name.as_str(), 0);
        }
        for procedure in &block.procedures {
            trace!(procedure = %procedure.name, "procedure declared");
        }
        self.exec_compound(&block.body)
    }

    fn exec_compound(&mut self, compound: &Compound) -> EvaluationResult<()> {
        for statement in &compound.statements {
            self.exec_statement(statement)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, statement: &Statement) -> EvaluationResult<()> {
        match statement {
            Statement::Compound(compound) => self.exec_compound(compound),
            Statement::Assign { target, value } => {
                let value = self.eval_expression(value)?;
                self.current_frame_mut()?.set(target.name.as_str(), value);
                Ok(())
            }
            Statement::Call { name, span, args } => self.exec_call(name, *span, args),
            Statement::Empty => Ok(()),
        }
    }

    fn exec_call(&mut self, name: &str, span: Span, args: &[Expression]) -> EvaluationResult<()> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expression(arg)?);
        }

        let procedure = self.procedures.get(name).copied().ok_or_else(|| {
            EvaluationError::UndefinedProcedure {
                name: name.to_string(),
                line: span.line,
                column: span.column,
            }
        })?;
        let params = &procedure.declaration.params;
        if params.len() != values.len() {
            return Err(EvaluationError::ArgumentCountMismatch {
                name: name.to_string(),
                expected: params.len(),
                found: values.len(),
                line: span.line,
                column: span.column,
            });
        }
        if self.call_stack.depth() >= self.max_call_depth {
            return Err(EvaluationError::CallDepthExceeded {
                name: name.to_string(),
                limit: self.max_call_depth,
                line: span.line,
                column: span.column,
            });
        }

        let mut record = ActivationRecord::new(name, FrameKind::Procedure, procedure.level);
        for (param, value) in params.iter().zip(values) {
            record.set(param.variable.name.as_str(), value);
        }
        self.run_frame(record, &procedure.declaration.block)?;
        Ok(())
    }

    fn eval_expression(&mut self, expr: &Expression) -> EvaluationResult<i64> {
        match expr {
            Expression::Number(value) => Ok(*value),
            Expression::Variable(variable) => {
                let frame = self.current_frame()?;
                frame
                    .get(&variable.name)
                    .ok_or_else(|| EvaluationError::UnboundVariable {
                        name: variable.name.clone(),
                        frame: frame.name().to_string(),
                        line: variable.span.line,
                        column: variable.span.column,
                    })
            }
            Expression::BinaryOp {
                left,
                op,
                span,
                right,
            } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                apply_binary(*op, left, right, *span)
            }
            Expression::UnaryOp { op, span, operand } => {
                let operand = self.eval_expression(operand)?;
                match op {
                    UnaryOperator::Plus => Ok(operand),
                    UnaryOperator::Minus => {
                        operand
                            .checked_neg()
                            .ok_or_else(|| EvaluationError::Overflow {
                                operation: format!("-{operand}"),
                                line: span.line,
                                column: span.column,
                            })
                    }
                }
            }
        }
    }

    fn current_frame(&self) -> EvaluationResult<&ActivationRecord> {
        self.call_stack
            .peek()
            .ok_or(EvaluationError::InvariantViolation {
                message: "no active frame",
            })
    }

    fn current_frame_mut(&mut self) -> EvaluationResult<&mut ActivationRecord> {
        self.call_stack
            .peek_mut()
            .ok_or(EvaluationError::InvariantViolation {
                message: "no active frame",
            })
    }
}

/// Integer arithmetic for binary operators. Both `/` and `div` truncate
/// toward zero.
pub(super) fn apply_binary(
    op: BinaryOperator,
    left: i64,
    right: i64,
    span: Span,
) -> EvaluationResult<i64> {
    let result = match op {
        BinaryOperator::Add => left.checked_add(right),
        BinaryOperator::Sub => left.checked_sub(right),
        BinaryOperator::Mul => left.checked_mul(right),
        BinaryOperator::Div | BinaryOperator::IntDiv => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero {
                    left,
                    operator: op.symbol(),
                    line: span.line,
                    column: span.column,
                });
            }
            left.checked_div(right)
        }
    };
    result.ok_or_else(|| EvaluationError::Overflow {
        operation: format!("{left} {} {right}", op.symbol()),
        line: span.line,
        column: span.column,
    })
}
