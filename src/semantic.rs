//! Static checks over a parsed program.
//!
//! One walk over the AST threads the current scope through a `SymbolTable`
//! arena. Declarations define symbols, references resolve through the chain
//! of enclosing scopes, and the first violation aborts the walk.

use tracing::{debug, info};

use crate::ast::{
    Block, Compound, Expression, ParamDecl, ProcedureDecl, Program, Statement, TypeSpec, VarDecl,
    Variable,
};
use crate::token::Span;

mod error;
mod scope;
mod symbol;

pub use error::{SemanticError, SemanticResult};
pub use scope::{BUILTIN_LEVEL, GLOBAL_LEVEL, Scope, ScopeId, SymbolTable};
pub use symbol::{Symbol, SymbolRef};

pub struct SemanticAnalyzer {
    table: SymbolTable,
    current: ScopeId,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            current: ScopeId::GLOBAL,
        }
    }

    /// Checks `program` and returns the builtin and global scopes it built.
    pub fn analyze(mut self, program: &Program) -> SemanticResult<SymbolTable> {
        self.table.define(
            ScopeId::BUILTIN,
            Symbol::Program {
                name: program.name.clone(),
            },
        );
        self.visit_block(&program.block)?;
        info!(
            program = %program.name,
            globals = self.table.global().len(),
            "semantic analysis finished"
        );
        Ok(self.table)
    }

    fn visit_block(&mut self, block: &Block) -> SemanticResult<()> {
        for declaration in &block.declarations {
            self.visit_var_decl(declaration)?;
        }
        for procedure in &block.procedures {
            self.visit_procedure(procedure)?;
        }
        self.visit_compound(&block.body)
    }

    fn visit_var_decl(&mut self, declaration: &VarDecl) -> SemanticResult<()> {
        self.declare_variable(&declaration.variable, declaration.type_spec)
    }

    fn visit_param_decl(&mut self, param: &ParamDecl) -> SemanticResult<()> {
        self.declare_variable(&param.variable, param.type_spec)
    }

    fn declare_variable(&mut self, variable: &Variable, type_spec: TypeSpec) -> SemanticResult<()> {
        if self.table.scope(self.current).contains(&variable.name) {
            return Err(SemanticError::DuplicateIdentifier {
                name: variable.name.clone(),
                line: variable.span.line,
                column: variable.span.column,
            });
        }
        let (type_ref, _) = self
            .table
            .lookup(self.current, type_spec.name())
            .ok_or_else(|| undeclared(type_spec.name(), variable.span))?;
        self.table.define(
            self.current,
            Symbol::Variable {
                name: variable.name.clone(),
                type_ref,
            },
        );
        debug!(
            name = %variable.name,
            %type_spec,
            scope = self.table.scope(self.current).name(),
            "defined variable"
        );
        Ok(())
    }

    fn visit_procedure(&mut self, procedure: &ProcedureDecl) -> SemanticResult<()> {
        if self.table.global().contains(&procedure.name) {
            return Err(SemanticError::DuplicateProcedure {
                name: procedure.name.clone(),
                line: procedure.span.line,
                column: procedure.span.column,
            });
        }
        self.table.define(
            ScopeId::GLOBAL,
            Symbol::Procedure {
                name: procedure.name.clone(),
                params: procedure
                    .params
                    .iter()
                    .map(|param| param.variable.name.clone())
                    .collect(),
            },
        );

        let parent = self.current;
        self.current = self.table.push(procedure.name.as_str(), parent);
        debug!(
            procedure = %procedure.name,
            level = self.table.scope(self.current).level(),
            "entered scope"
        );

        for param in &procedure.params {
            self.visit_param_decl(param)?;
        }
        self.visit_block(&procedure.block)?;

        self.table.pop();
        self.current = parent;
        debug!(procedure = %procedure.name, "left scope");
        Ok(())
    }

    fn visit_compound(&mut self, compound: &Compound) -> SemanticResult<()> {
        for statement in &compound.statements {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> SemanticResult<()> {
        match statement {
            Statement::Compound(compound) => self.visit_compound(compound),
            Statement::Assign { target, value } => {
                self.visit_expression(value)?;
                self.visit_variable(target)
            }
            Statement::Call { name, span, args } => {
                match self.table.lookup(self.current, name) {
                    None => return Err(undeclared(name, *span)),
                    Some((_, Symbol::Procedure { params, .. })) => {
                        if params.len() != args.len() {
                            return Err(SemanticError::ArgumentCountMismatch {
                                name: name.clone(),
                                expected: params.len(),
                                found: args.len(),
                                line: span.line,
                                column: span.column,
                            });
                        }
                    }
                    Some(_) => {
                        return Err(SemanticError::NotAProcedure {
                            name: name.clone(),
                            line: span.line,
                            column: span.column,
                        });
                    }
                }
                for arg in args {
                    self.visit_expression(arg)?;
                }
                Ok(())
            }
            Statement::Empty => Ok(()),
        }
    }

    fn visit_expression(&mut self, expr: &Expression) -> SemanticResult<()> {
        match expr {
            Expression::Number(_) => Ok(()),
            Expression::Variable(variable) => self.visit_variable(variable),
            Expression::BinaryOp { left, right, .. } => {
                self.visit_expression(left)?;
                self.visit_expression(right)
            }
            Expression::UnaryOp { operand, .. } => self.visit_expression(operand),
        }
    }

    fn visit_variable(&self, variable: &Variable) -> SemanticResult<()> {
        match self.table.lookup(self.current, &variable.name) {
            Some((_, Symbol::Variable { .. })) => Ok(()),
            Some((_, symbol)) => Err(SemanticError::NotAVariable {
                name: variable.name.clone(),
                kind: symbol.kind_name(),
                line: variable.span.line,
                column: variable.span.column,
            }),
            None => Err(undeclared(&variable.name, variable.span)),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn undeclared(name: &str, span: Span) -> SemanticError {
    SemanticError::UndeclaredIdentifier {
        name: name.to_string(),
        line: span.line,
        column: span.column,
    }
}

pub fn analyze(program: &Program) -> SemanticResult<SymbolTable> {
    SemanticAnalyzer::new().analyze(program)
}
