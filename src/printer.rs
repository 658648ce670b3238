//! Human-readable dumps of the AST, the symbol table and final bindings.

use std::fmt::Write;

use crate::ast::{Block, Compound, Expression, ProcedureDecl, Program, Statement};
use crate::interpreter::Bindings;
use crate::semantic::{Scope, SymbolTable};

const INDENT: &str = "    ";

/// Postorder dump of `program`: children first, each node indented by its
/// depth in the tree.
pub fn render_ast(program: &Program) -> String {
    let mut printer = AstPrinter::default();
    printer.program(program);
    printer.out
}

#[derive(Default)]
struct AstPrinter {
    out: String,
    level: usize,
}

impl AstPrinter {
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.level += 1;
        f(self);
        self.level -= 1;
    }

    fn program(&mut self, program: &Program) {
        self.nested(|p| p.block(&program.block));
        self.line(self.level, &format!("Program \"{}\"", program.name));
    }

    fn block(&mut self, block: &Block) {
        self.nested(|p| {
            for procedure in &block.procedures {
                p.procedure(procedure);
            }
            for declaration in &block.declarations {
                p.line(
                    p.level,
                    &format!(
                        "VAR -> {} : {}",
                        declaration.variable.name, declaration.type_spec
                    ),
                );
            }
            p.compound(&block.body);
        });
        self.line(self.level, "Block");
    }

    fn procedure(&mut self, procedure: &ProcedureDecl) {
        self.nested(|p| {
            p.block(&procedure.block);
            for param in &procedure.params {
                p.line(
                    p.level,
                    &format!("PARAM -> {} : {}", param.variable.name, param.type_spec),
                );
            }
        });
        self.line(self.level, &format!("Procedure \"{}\"", procedure.name));
    }

    fn compound(&mut self, compound: &Compound) {
        self.nested(|p| {
            for statement in &compound.statements {
                p.statement(statement);
            }
        });
        self.line(self.level, "Compound Statement");
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Compound(compound) => self.compound(compound),
            Statement::Assign { target, value } => {
                self.nested(|p| {
                    p.line(p.level, &format!("Variable {{\"name\" = \"{}\"}}", target.name));
                    p.line(p.level, ":=");
                    p.expression(value);
                });
                self.line(
                    self.level,
                    &format!("Assignment Statement {{ {} = ... }}", target.name),
                );
            }
            Statement::Call { name, args, .. } => {
                self.nested(|p| {
                    for arg in args {
                        p.expression(arg);
                    }
                });
                self.line(self.level, &format!("Procedure Call {{ {name}(...) }}"));
            }
            Statement::Empty => self.line(self.level, "Empty Statement"),
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Number(value) => {
                self.line(self.level, &format!("NumberNode: {{ Value: {value} }}"));
            }
            Expression::Variable(variable) => {
                self.line(
                    self.level,
                    &format!("Variable {{\"name\" = \"{}\"}}", variable.name),
                );
            }
            Expression::BinaryOp {
                left, op, right, ..
            } => {
                self.nested(|p| {
                    p.expression(left);
                    p.expression(right);
                });
                self.line(self.level, &format!("BinaryOp: {{ Op: {} }}", op.symbol()));
            }
            Expression::UnaryOp { op, operand, .. } => {
                self.nested(|p| p.expression(operand));
                self.line(self.level, &format!("UnaryOp: {{ Op: {} }}", op.symbol()));
            }
        }
    }
}

/// Dumps the builtin and global scopes kept after analysis.
pub fn render_symbols(table: &SymbolTable) -> String {
    let mut out = String::new();
    for scope in table.scopes() {
        render_scope(&mut out, scope);
    }
    out
}

fn render_scope(out: &mut String, scope: &Scope) {
    let _ = writeln!(out, "Scoped symbol table");
    let _ = writeln!(out, "Level: {} | Name: {}", scope.level(), scope.name());
    for symbol in scope.symbols() {
        let _ = writeln!(out, "{INDENT}{:<12} --> {symbol}", symbol.name());
    }
}

pub fn render_bindings(bindings: &Bindings) -> String {
    let mut out = String::from("GLOBAL SCOPE:\n");
    for (name, value) in bindings {
        let _ = writeln!(out, "{{ [\"{name}\"] = {value} }}");
    }
    out
}
