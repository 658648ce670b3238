use std::{iter::Peekable, str::CharIndices};

use tracing::trace;

use crate::token::{Span, Token, TokenKind, keyword};

mod error;

pub use error::{LexError, LexResult};

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    eof_reached: bool,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            eof_reached: false,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        self.skip_trivia()?;

        let (start_idx, ch) = match self.chars.peek() {
            Some(&(idx, c)) => (idx, c),
            None => {
                self.eof_reached = true;
                return Ok(Token::new(TokenKind::EOF, "EOF", self.point_span()));
            }
        };

        let start_line = self.line;
        let start_column = self.column;
        let token = match ch {
            c if c.is_ascii_digit() => self.read_integer(start_idx, start_line, start_column),
            c if c.is_ascii_alphabetic() => {
                self.read_identifier(start_idx, start_line, start_column)
            }
            ':' => {
                if self.peek_second() == Some('=') {
                    self.symbol(TokenKind::Assign, 2, start_idx, start_line, start_column)
                } else {
                    self.symbol(TokenKind::Colon, 1, start_idx, start_line, start_column)
                }
            }
            '+' => self.symbol(TokenKind::Plus, 1, start_idx, start_line, start_column),
            '-' => self.symbol(TokenKind::Minus, 1, start_idx, start_line, start_column),
            '*' => self.symbol(TokenKind::Star, 1, start_idx, start_line, start_column),
            '/' => self.symbol(TokenKind::Slash, 1, start_idx, start_line, start_column),
            '(' => self.symbol(TokenKind::LParen, 1, start_idx, start_line, start_column),
            ')' => self.symbol(TokenKind::RParen, 1, start_idx, start_line, start_column),
            ',' => self.symbol(TokenKind::Comma, 1, start_idx, start_line, start_column),
            '.' => self.symbol(TokenKind::Dot, 1, start_idx, start_line, start_column),
            ';' => self.symbol(TokenKind::Semi, 1, start_idx, start_line, start_column),
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: ch,
                    line: start_line,
                    column: start_column,
                });
            }
        };
        trace!(kind = %token.kind, lexeme = token.lexeme, line = start_line, column = start_column, "token");
        Ok(token)
    }

    /// Next raw character of the source, without skipping whitespace.
    ///
    /// The parser uses this right after an identifier to tell `name(...)`
    /// calls apart from assignments.
    pub fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_trivia(&mut self) -> LexResult<()> {
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                ' ' | '\n' | '\t' | '\r' => {
                    self.advance_char();
                }
                '{' => self.skip_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> LexResult<()> {
        let line = self.line;
        let column = self.column;
        self.advance_char(); // Consume opening brace
        while let Some((_, c)) = self.advance_char() {
            if c == '}' {
                return Ok(());
            }
        }
        Err(LexError::UnterminatedComment { line, column })
    }

    fn symbol(
        &mut self,
        kind: TokenKind,
        width: usize,
        start: usize,
        line: usize,
        column: usize,
    ) -> Token<'a> {
        for _ in 0..width {
            self.advance_char();
        }
        let end = start + width;
        Token::new(
            kind,
            &self.input[start..end],
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }

    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first char
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() {
                self.advance_char();
            } else {
                break;
            }
        }

        let end = self.current_index();
        let span = Span {
            start,
            end,
            line,
            column,
        };
        let ident = &self.input[start..end];
        match keyword(ident) {
            Some((spelling, kind)) => Token::new(kind, spelling, span),
            None => Token::new(TokenKind::Identifier, ident, span),
        }
    }

    fn read_integer(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first digit
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else {
                break;
            }
        }

        let end = self.current_index();
        Token::new(
            TokenKind::Integer,
            &self.input[start..end],
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    /// Yields tokens up to and including the first `EOF`, then stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_reached {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            // Stop after the first error.
            self.eof_reached = true;
        }
        Some(result)
    }
}

impl<'a> Lexer<'a> {
    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }
            self.column += 1;
        }
        next
    }

    fn peek_second(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next().map(|(_, c)| c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn point_span(&mut self) -> Span {
        let index = self.current_index();
        Span {
            start: index,
            end: index,
            line: self.line,
            column: self.column,
        }
    }
}

pub fn tokenize<'a>(input: &'a str) -> LexResult<Vec<Token<'a>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::EOF);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}
