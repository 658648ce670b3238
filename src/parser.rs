use tracing::info;

use crate::ast::{
    BinaryOperator, Block, Compound, Expression, ParamDecl, ProcedureDecl, Program, Statement,
    TypeSpec, UnaryOperator, VarDecl, Variable,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

mod error;

pub use error::{ParseError, ParseResult};

/// Deepest allowed nesting of factors, compound statements and procedure
/// declarations, counted together.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Predictive recursive-descent parser with a single token of lookahead.
///
/// The lexer is pulled lazily, so it always sits right behind `current`. That
/// lets `parse_simple_statement` peek at the raw character after an
/// identifier to decide between a call and an assignment.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    pub fn parse(mut self) -> ParseResult<Program> {
        let program = self.parse_program()?;
        self.expect(TokenKind::EOF)?;
        info!(program = %program.name, "parsed program");
        Ok(program)
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(TokenKind::Program)?;
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Semi)?;
        let block = self.parse_block()?;
        self.expect(TokenKind::Dot)?;
        Ok(Program {
            name: name.lexeme.to_string(),
            span: name.span,
            block,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut declarations = Vec::new();
        if self.at(TokenKind::Var) {
            self.advance()?;
            while self.at(TokenKind::Identifier) {
                let variables = self.parse_variable_list()?;
                self.expect(TokenKind::Colon)?;
                let type_spec = self.parse_type()?;
                self.expect(TokenKind::Semi)?;
                declarations.extend(
                    variables
                        .into_iter()
                        .map(|variable| VarDecl {
                            variable,
                            type_spec,
                        }),
                );
            }
        }

        let mut procedures = Vec::new();
        while self.at(TokenKind::Procedure) {
            procedures.push(self.parse_procedure()?);
        }

        let body = self.parse_compound()?;
        Ok(Block {
            declarations,
            procedures,
            body,
        })
    }

    fn parse_procedure(&mut self) -> ParseResult<ProcedureDecl> {
        self.expect(TokenKind::Procedure)?;
        let name = self.expect(TokenKind::Identifier)?;

        let mut params = Vec::new();
        if self.at(TokenKind::LParen) {
            self.advance()?;
            loop {
                let variables = self.parse_variable_list()?;
                self.expect(TokenKind::Colon)?;
                let type_spec = self.parse_type()?;
                params.extend(
                    variables
                        .into_iter()
                        .map(|variable| ParamDecl {
                            variable,
                            type_spec,
                        }),
                );
                if !self.at(TokenKind::Semi) {
                    break;
                }
                self.advance()?;
            }
            self.expect(TokenKind::RParen)?;
        }

        self.expect(TokenKind::Semi)?;
        let block = self.nested(Self::parse_block)?;
        self.expect(TokenKind::Semi)?;
        Ok(ProcedureDecl {
            name: name.lexeme.to_string(),
            span: name.span,
            params,
            block,
        })
    }

    fn parse_variable_list(&mut self) -> ParseResult<Vec<Variable>> {
        let mut variables = vec![self.parse_variable()?];
        while self.at(TokenKind::Comma) {
            self.advance()?;
            variables.push(self.parse_variable()?);
        }
        Ok(variables)
    }

    fn parse_type(&mut self) -> ParseResult<TypeSpec> {
        if self.at(TokenKind::RealType) {
            self.advance()?;
            return Ok(TypeSpec::Real);
        }
        self.expect(TokenKind::IntegerType)?;
        Ok(TypeSpec::Integer)
    }

    fn parse_compound(&mut self) -> ParseResult<Compound> {
        self.nested(|parser| {
            parser.expect(TokenKind::Begin)?;
            let statements = parser.parse_statement_list()?;
            parser.expect(TokenKind::End)?;
            Ok(Compound { statements })
        })
    }

    fn parse_statement_list(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::EOF => {
                    return Err(ParseError::MissingEnd {
                        line: self.current.span.line,
                        column: self.current.span.column,
                    });
                }
                TokenKind::End => {
                    statements.push(Statement::Empty);
                    return Ok(statements);
                }
                TokenKind::Begin => {
                    statements.push(Statement::Compound(self.parse_compound()?));
                    self.expect(TokenKind::Semi)?;
                }
                _ => {
                    statements.push(self.parse_simple_statement()?);
                    if self.at(TokenKind::Semi) {
                        self.advance()?;
                    }
                }
            }
        }
    }

    fn parse_simple_statement(&mut self) -> ParseResult<Statement> {
        let is_call = self.at(TokenKind::Identifier) && self.lexer.peek_char() == Some('(');
        let name = self.expect(TokenKind::Identifier)?;

        if is_call {
            self.expect(TokenKind::LParen)?;
            let mut args = Vec::new();
            if !self.at(TokenKind::RParen) {
                args.push(self.parse_expression()?);
                while self.at(TokenKind::Comma) {
                    self.advance()?;
                    args.push(self.parse_expression()?);
                }
            }
            self.expect(TokenKind::RParen)?;
            return Ok(Statement::Call {
                name: name.lexeme.to_string(),
                span: name.span,
                args,
            });
        }

        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        Ok(Statement::Assign {
            target: Variable::new(name.lexeme, name.span),
            value,
        })
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            let span = self.advance()?.span;
            let right = self.parse_term()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                span,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                TokenKind::IntDiv => BinaryOperator::IntDiv,
                _ => break,
            };
            let span = self.advance()?.span;
            let right = self.parse_factor()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                span,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_nested_factor)
    }

    fn parse_nested_factor(&mut self) -> ParseResult<Expression> {
        match self.current.kind {
            TokenKind::Integer => {
                let token = self.advance()?;
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    ParseError::InvalidIntegerLiteral {
                        literal: token.lexeme.to_string(),
                        line: token.span.line,
                        column: token.span.column,
                    }
                })?;
                Ok(Expression::Number(value))
            }
            TokenKind::Identifier => Ok(Expression::Variable(self.parse_variable()?)),
            TokenKind::Plus | TokenKind::Minus => {
                let op = if self.at(TokenKind::Plus) {
                    UnaryOperator::Plus
                } else {
                    UnaryOperator::Minus
                };
                let span = self.advance()?.span;
                let operand = self.parse_factor()?;
                Ok(Expression::UnaryOp {
                    op,
                    span,
                    operand: Box::new(operand),
                })
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(ParseError::invalid_factor(&self.current)),
        }
    }

    fn parse_variable(&mut self) -> ParseResult<Variable> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Variable::new(token.lexeme, token.span))
    }

    /// Runs `production` one nesting level deeper, failing once the limit
    /// is reached.
    fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: self.current.span.line,
                column: self.current.span.column,
            });
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        if self.at(kind) {
            self.advance()
        } else {
            Err(ParseError::unexpected(kind, &self.current))
        }
    }

    fn advance(&mut self) -> ParseResult<Token<'a>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }
}

pub fn parse(input: &str) -> ParseResult<Program> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexError;
    use crate::token::Span;
    use indoc::indoc;

    fn var(name: &str) -> Expression {
        Expression::Variable(Variable::new(name, Default::default()))
    }

    fn int(value: i64) -> Expression {
        Expression::Number(value)
    }

    fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            span: Span::default(),
            right: Box::new(right),
        }
    }

    fn unary(op: UnaryOperator, operand: Expression) -> Expression {
        Expression::UnaryOp {
            op,
            span: Span::default(),
            operand: Box::new(operand),
        }
    }

    /// Parses `body` as the compound statement of a minimal program.
    fn parse_body(body: &str) -> ParseResult<Vec<Statement>> {
        let source = format!("program t; begin {body} end.");
        parse(&source).map(|program| strip_spans(program.block.body.statements))
    }

    fn strip_expression(expr: Expression) -> Expression {
        match expr {
            Expression::Variable(variable) => var(&variable.name),
            Expression::BinaryOp {
                left, op, right, ..
            } => binary(strip_expression(*left), op, strip_expression(*right)),
            Expression::UnaryOp { op, operand, .. } => unary(op, strip_expression(*operand)),
            Expression::Number(value) => Expression::Number(value),
        }
    }

    fn strip_spans(statements: Vec<Statement>) -> Vec<Statement> {
        statements
            .into_iter()
            .map(|statement| match statement {
                Statement::Compound(compound) => Statement::Compound(Compound {
                    statements: strip_spans(compound.statements),
                }),
                Statement::Assign { target, value } => Statement::Assign {
                    target: Variable::new(target.name, Default::default()),
                    value: strip_expression(value),
                },
                Statement::Call { name, args, .. } => Statement::Call {
                    name,
                    span: Default::default(),
                    args: args.into_iter().map(strip_expression).collect(),
                },
                Statement::Empty => Statement::Empty,
            })
            .collect()
    }

    fn assign(name: &str, value: Expression) -> Statement {
        Statement::Assign {
            target: Variable::new(name, Default::default()),
            value,
        }
    }

    #[test]
    fn parses_simple_program() {
        let input = indoc! {"
            program Test;
            var a, b : integer;
                r : REAL;
            begin
               a := 2 + 3 * (4 - 1);
               b := a div 2;
            end.
        "};
        let program = parse(input).expect("parse failed");

        assert_eq!(program.name, "Test");
        let declared = program
            .block
            .declarations
            .iter()
            .map(|decl| (decl.variable.name.as_str(), decl.type_spec))
            .collect::<Vec<_>>();
        assert_eq!(
            declared,
            vec![
                ("a", TypeSpec::Integer),
                ("b", TypeSpec::Integer),
                ("r", TypeSpec::Real),
            ]
        );

        let expected = vec![
            assign(
                "a",
                binary(
                    int(2),
                    BinaryOperator::Add,
                    binary(
                        int(3),
                        BinaryOperator::Mul,
                        binary(int(4), BinaryOperator::Sub, int(1)),
                    ),
                ),
            ),
            assign("b", binary(var("a"), BinaryOperator::IntDiv, int(2))),
            Statement::Empty,
        ];
        assert_eq!(strip_spans(program.block.body.statements), expected);
    }

    #[test]
    fn binary_operators_are_left_associative() {
        let statements = parse_body("x := 8 - 2 - 1; y := 8 / 2 * 3").expect("parse failed");
        assert_eq!(
            statements,
            vec![
                assign(
                    "x",
                    binary(
                        binary(int(8), BinaryOperator::Sub, int(2)),
                        BinaryOperator::Sub,
                        int(1),
                    ),
                ),
                assign(
                    "y",
                    binary(
                        binary(int(8), BinaryOperator::Div, int(2)),
                        BinaryOperator::Mul,
                        int(3),
                    ),
                ),
                Statement::Empty,
            ]
        );
    }

    #[test]
    fn parses_nested_unary_operators() {
        let statements = parse_body("x := - + 3").expect("parse failed");
        assert_eq!(
            statements[0],
            assign(
                "x",
                unary(UnaryOperator::Minus, unary(UnaryOperator::Plus, int(3))),
            )
        );
    }

    #[test]
    fn parses_procedures_with_parameter_lines() {
        let input = indoc! {"
            program Main;
            procedure Alpha(a, b : integer; c : real);
            var x : integer;
            procedure Beta;
            begin end;
            begin
               x := a + b;
            end;
            begin
               Alpha(1, 2 * 3, 4);
            end.
        "};
        let program = parse(input).expect("parse failed");
        let alpha = &program.block.procedures[0];
        assert_eq!(alpha.name, "Alpha");
        let params = alpha
            .params
            .iter()
            .map(|param| (param.variable.name.as_str(), param.type_spec))
            .collect::<Vec<_>>();
        assert_eq!(
            params,
            vec![
                ("a", TypeSpec::Integer),
                ("b", TypeSpec::Integer),
                ("c", TypeSpec::Real),
            ]
        );
        assert_eq!(alpha.block.procedures[0].name, "Beta");
        assert!(alpha.block.procedures[0].params.is_empty());

        let statements = strip_spans(program.block.body.statements);
        assert_eq!(
            statements[0],
            Statement::Call {
                name: "Alpha".to_string(),
                span: Default::default(),
                args: vec![
                    int(1),
                    binary(int(2), BinaryOperator::Mul, int(3)),
                    int(4),
                ],
            }
        );
    }

    #[test]
    fn call_requires_parenthesis_right_after_name() {
        let err = parse_body("p (1)").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::Assign,
                found: TokenKind::LParen,
                ..
            }
        ));
    }

    #[test]
    fn nested_compound_requires_semicolon() {
        let statements = parse_body("begin x := 1 end; y := 2").expect("parse failed");
        assert_eq!(
            statements,
            vec![
                Statement::Compound(Compound {
                    statements: vec![assign("x", int(1)), Statement::Empty],
                }),
                assign("y", int(2)),
                Statement::Empty,
            ]
        );

        let err = parse_body("begin x := 1 end y := 2").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::Semi,
                found: TokenKind::Identifier,
                ..
            }
        ));
    }

    #[test]
    fn reports_expected_and_actual_token() {
        let err = parse("program t begin end.").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::Semi,
                found: TokenKind::Begin,
                lexeme: "begin".to_string(),
                line: 1,
                column: 11,
            }
        );
        assert_eq!(
            err.to_string(),
            "Expected SEMI, got BEGIN 'begin' at line 1, column 11"
        );
    }

    #[test]
    fn errors_on_missing_end() {
        let err = parse("program t; begin x := 1;").expect_err("expected parse failure");
        assert!(matches!(err, ParseError::MissingEnd { .. }));
    }

    #[test]
    fn errors_on_invalid_factor() {
        let err = parse_body("x := * 2").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::InvalidFactor {
                found: TokenKind::Star,
                ..
            }
        ));
    }

    #[test]
    fn errors_on_trailing_tokens() {
        let err = parse("program t; begin end. x").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EOF,
                ..
            }
        ));
    }

    #[test]
    fn errors_on_integer_overflow() {
        let err = parse_body("n := 99999999999999999999999999").expect_err("expected overflow");
        assert!(err.to_string().contains("Invalid integer literal"));
    }

    #[test]
    fn surfaces_lexer_errors() {
        let err = parse_body("x := 1 # 2").expect_err("expected lexing failure");
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnexpectedCharacter { character: '#', .. })
        ));
    }

    #[test]
    fn long_statement_lists_do_not_recurse() {
        let body = "x := 1;\n".repeat(50_000);
        let statements = parse_body(&body).expect("parse failed");
        assert_eq!(statements.len(), 50_001);
    }

    #[test]
    fn moderate_nesting_is_accepted() {
        let body = format!("x := {}1{}", "(".repeat(100), ")".repeat(100));
        let statements = parse_body(&body).expect("parse failed");
        assert_eq!(statements[0], assign("x", int(1)));

        let body = format!("x := {}1", "-".repeat(100));
        assert!(parse_body(&body).is_ok());
    }

    #[test]
    fn deep_expressions_fail_instead_of_overflowing() {
        let body = format!("x := {}1", "-".repeat(1_000));
        let err = parse_body(&body).expect_err("expected nesting failure");
        assert!(matches!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: 1,
                ..
            }
        ));

        let body = format!("x := {}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = parse_body(&body).expect_err("expected nesting failure");
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn deep_compounds_and_procedures_fail_instead_of_overflowing() {
        let body = format!("{}{}", "begin ".repeat(1_000), "end; ".repeat(1_000));
        let err = parse_body(&body).expect_err("expected nesting failure");
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));

        let source = format!(
            "program t; {} begin end.",
            "procedure p; ".repeat(1_000)
        );
        let err = parse(&source).expect_err("expected nesting failure");
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }
}
