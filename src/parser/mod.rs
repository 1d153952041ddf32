pub mod expression;
pub mod statement;


use crate::ast::{Program, Spanned, Stmt};
use crate::error::CompileError;
use crate::lexer::Lexer;
use crate::lexer::token::Token;
use crate::lexer::vocab::Vocabulary;

use tracing::{instrument, trace};

use std::ops::Range;

/// Saved cursor position for speculative parsing.
#[derive(Clone)]
struct Checkpoint<'src> {
    lexer: Lexer<'src>,
    current: (Token, Range<usize>),
    last_end: usize,
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: (Token, Range<usize>),
    last_end: usize,
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> Result<Self, CompileError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            last_end: 0,
        })
    }

    pub fn from_source(source: &'src str, vocab: &'src Vocabulary) -> Result<Self, CompileError> {
        Self::new(Lexer::new(source, vocab))
    }

    #[instrument(skip_all)]
    pub fn parse_program(&mut self) -> Result<Program, CompileError> {
        trace!("Parser::parse_program()");
        let mut statements = vec![];
        while !self.at(&Token::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    /// Parses exactly one expression spanning the whole input.
    pub fn parse_standalone_expression(&mut self) -> Result<Spanned<crate::ast::Expr>, CompileError> {
        let expr = self.parse_expression()?;
        if !self.at(&Token::Eof) {
            return Err(CompileError::syntax(
                format!("unexpected {} after expression", self.peek()),
                self.span(),
            ));
        }
        Ok(expr)
    }

    pub(crate) fn vocab(&self) -> &'src Vocabulary {
        self.lexer.vocab()
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.current.0
    }

    pub(crate) fn span(&self) -> Range<usize> {
        self.current.1.clone()
    }

    /// The token after the current one, without moving the cursor.
    pub(crate) fn peek_second(&self) -> Result<Token, CompileError> {
        let mut lookahead = self.lexer.clone();
        lookahead.next_token().map(|(token, _)| token)
    }

    pub(crate) fn at(&self, kind: &Token) -> bool {
        self.current.0.same_kind(kind)
    }

    pub(crate) fn advance(&mut self) -> Result<(Token, Range<usize>), CompileError> {
        let next = self.lexer.next_token()?;
        self.last_end = self.current.1.end;
        Ok(std::mem::replace(&mut self.current, next))
    }

    pub(crate) fn eat(&mut self, expected: Token) -> Result<Range<usize>, CompileError> {
        if self.at(&expected) {
            return self.advance().map(|(_, span)| span);
        }
        Err(CompileError::syntax(
            format!("expected {} but found {}", expected, self.peek()),
            self.span(),
        ))
    }

    pub(crate) fn eat_identifier(&mut self, what: &str) -> Result<Spanned<String>, CompileError> {
        if let Token::Identifier(_) = self.peek() {
            let (token, span) = self.advance()?;
            if let Token::Identifier(name) = token {
                return Ok((name, span));
            }
        }
        Err(CompileError::syntax(
            format!("expected {} but found {}", what, self.peek()),
            self.span(),
        ))
    }

    fn checkpoint(&self) -> Checkpoint<'src> {
        Checkpoint {
            lexer: self.lexer.clone(),
            current: self.current.clone(),
            last_end: self.last_end,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint<'src>) {
        self.lexer = checkpoint.lexer;
        self.current = checkpoint.current;
        self.last_end = checkpoint.last_end;
    }

    /// Runs `attempt`; on failure the cursor is rewound to where it was
    /// and `None` is returned.
    pub(crate) fn attempt<T>(
        &mut self,
        attempt: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Option<T> {
        let checkpoint = self.checkpoint();
        match attempt(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(checkpoint);
                None
            }
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.span().start;
        let stmt = match self.peek() {
            Token::KeywordAll | Token::KeywordFix => match self.peek_second()? {
                Token::KeywordAssign => self.parse_declaration_statement()?,
                Token::KeywordStore => self.parse_store()?,
                other => {
                    let qualifier = self.peek().clone();
                    return Err(CompileError::syntax(
                        format!("expected 'assign' or 'store' after {qualifier} but found {other}"),
                        self.span(),
                    ));
                }
            },
            Token::KeywordAssign => self.parse_declaration_statement()?,
            Token::KeywordStore => self.parse_store()?,
            Token::KeywordUpdate => {
                let mutation = self.parse_mutation()?;
                self.eat(Token::Semicolon)?;
                Stmt::Update(mutation)
            }
            Token::KeywordCheck => self.parse_check()?,
            Token::KeywordRepeat => match self.peek_second()? {
                Token::KeywordUntil => self.parse_repeat_until()?,
                _ => self.parse_repeat()?,
            },
            Token::KeywordFor => self.parse_for()?,
            Token::KeywordMake => self.parse_make()?,
            Token::KeywordGive => Stmt::Give(self.parse_keyword_expression()?),
            Token::KeywordShow => Stmt::Show(self.parse_keyword_expression()?),
            Token::KeywordError => Stmt::Error(self.parse_keyword_expression()?),
            Token::KeywordPanic => Stmt::Panic(self.parse_keyword_expression()?),
            Token::KeywordSkip => {
                self.advance()?;
                self.eat(Token::Semicolon)?;
                Stmt::Skip
            }
            Token::KeywordHalt => {
                self.advance()?;
                self.eat(Token::Semicolon)?;
                Stmt::Halt
            }
            Token::Raw(_) => {
                let code = match self.advance()? {
                    (Token::Raw(code), _) => code,
                    (other, span) => {
                        return Err(CompileError::syntax(
                            format!("expected raw block but found {other}"),
                            span,
                        ));
                    }
                };
                if self.at(&Token::Semicolon) {
                    self.advance()?;
                }
                Stmt::Raw(code)
            }
            Token::KeywordCall | Token::KeywordMethod => {
                let expr = self.parse_expression()?;
                self.eat(Token::Semicolon)?;
                Stmt::Expr(expr)
            }
            other => {
                return Err(CompileError::syntax(
                    format!("unrecognized statement starting with {other}"),
                    self.span(),
                )
                .with_note("statements start with a keyword such as assign, store, update, check, repeat, make, call or show"));
            }
        };
        Ok((stmt, start..self.previous_end()))
    }

    /// End of the most recently consumed token.
    pub(crate) fn previous_end(&self) -> usize {
        self.last_end
    }
}
