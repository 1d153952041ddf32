use crate::ast::{
    Binding, CheckChain, Declaration, Expr, ForInit, Function, Guarded, Mutation, Spanned, Stmt,
    Store,
};
use crate::error::{CompileError, syntax_hint};
use crate::lexer::token::{DeclaredType, Token};
use crate::parser::Parser;

use tracing::trace;

fn declaration_syntax() -> String {
    syntax_hint(&[
        ("the syntax for a declaration is: [", false),
        ("all", true),
        ("|", false),
        ("fix", true),
        ("] ", false),
        ("assign", true),
        (" name [", false),
        ("as", true),
        (" type] [= value];", false),
    ])
}

fn loop_syntax() -> String {
    syntax_hint(&[
        ("loops are written ", false),
        ("repeat", true),
        (" [i in start to end, step] { ... } or ", false),
        ("repeat", true),
        (" [item in items] { ... }", false),
    ])
}

impl Parser<'_> {
    fn parse_binding(&mut self) -> Result<Binding, CompileError> {
        match self.peek() {
            Token::KeywordAll => {
                self.advance()?;
                Ok(Binding::Global)
            }
            Token::KeywordFix => {
                self.advance()?;
                Ok(Binding::Fixed)
            }
            _ => Ok(Binding::Local),
        }
    }

    fn parse_type_annotation(&mut self) -> Result<Option<Spanned<DeclaredType>>, CompileError> {
        if !self.at(&Token::KeywordAs) {
            return Ok(None);
        }
        self.advance()?;
        match self.advance()? {
            (Token::Type(ty), span) => Ok(Some((ty, span))),
            (other, span) => Err(CompileError::syntax(
                format!("expected a type name after 'as' but found {other}"),
                span,
            )
            .with_note("types are string, int, double, bool, array, object, null and undefined")),
        }
    }

    /// Declaration without its terminator, shared with the `for` header.
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, CompileError> {
        trace!("Parser::parse_declaration()");
        let binding = self.parse_binding()?;
        let keyword_span = self.eat(Token::KeywordAssign)?;
        let (name, _) = self.eat_identifier("a variable name after 'assign'")?;
        let declared = self.parse_type_annotation()?;

        let value = if self.at(&Token::Assign) {
            self.advance()?;
            Some(self.parse_expression()?)
        } else {
            None
        };

        if value.is_none() {
            if declared.is_none() {
                return Err(CompileError::syntax(
                    format!("declaration of `{name}` needs a type annotation when it has no value"),
                    keyword_span.start..self.previous_end(),
                )
                .with_note(declaration_syntax()));
            }
            if binding == Binding::Fixed {
                return Err(CompileError::syntax(
                    format!("fixed binding `{name}` must be given a value"),
                    keyword_span.start..self.previous_end(),
                )
                .with_note(declaration_syntax()));
            }
        }

        Ok(Declaration {
            binding,
            name,
            declared,
            value,
        })
    }

    pub(crate) fn parse_declaration_statement(&mut self) -> Result<Stmt, CompileError> {
        let declaration = self.parse_declaration()?;
        self.eat(Token::Semicolon)?;
        Ok(Stmt::Declare(declaration))
    }

    pub(crate) fn parse_store(&mut self) -> Result<Stmt, CompileError> {
        trace!("Parser::parse_store()");
        let binding = self.parse_binding()?;
        self.eat(Token::KeywordStore)?;
        let (name, _) = self.eat_identifier("a variable name after 'store'")?;
        self.eat(Token::Assign)?;

        let (token, text_span) = self.advance()?;
        let (text, quote) = match token {
            Token::Str(text, quote) => (text, quote),
            other => {
                return Err(CompileError::syntax(
                    format!("'store' requires a string literal but found {other}"),
                    text_span,
                )
                .with_note("use a backtick string such as `Hello, [name]!` for interpolation"));
            }
        };
        self.eat(Token::Semicolon)?;

        Ok(Stmt::Store(Store {
            binding,
            name,
            text,
            quote,
            text_span,
        }))
    }

    /// `update name{i}{j} = value`, without its terminator.
    pub(crate) fn parse_mutation(&mut self) -> Result<Mutation, CompileError> {
        self.eat(Token::KeywordUpdate)?;
        let (target, _) = self.eat_identifier("a variable name after 'update'")?;

        let mut indices = vec![];
        while self.at(&Token::LBrace) {
            self.advance()?;
            indices.push(self.parse_expression()?);
            self.eat(Token::RBrace)?;
        }

        self.eat(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(Mutation {
            target,
            indices,
            value,
        })
    }

    pub(crate) fn parse_block(&mut self) -> Result<Vec<Spanned<Stmt>>, CompileError> {
        self.eat(Token::LBrace)?;
        let mut body = vec![];
        while !self.at(&Token::RBrace) {
            if self.at(&Token::Eof) {
                return Err(CompileError::syntax(
                    "expected '}' to close the block but reached end of file",
                    self.span(),
                ));
            }
            body.push(self.parse_statement()?);
        }
        self.eat(Token::RBrace)?;
        Ok(body)
    }

    fn parse_guarded(&mut self) -> Result<Guarded, CompileError> {
        self.eat(Token::KeywordCheck)?;
        let condition = self.parse_bracketed_expression()?;
        let body = self.parse_block()?;
        Ok(Guarded { condition, body })
    }

    fn parse_bracketed_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.eat(Token::LBracket)?;
        let expr = self.parse_expression()?;
        self.eat(Token::RBracket)?;
        Ok(expr)
    }

    pub(crate) fn parse_check(&mut self) -> Result<Stmt, CompileError> {
        trace!("Parser::parse_check()");
        let primary = self.parse_guarded()?;

        let mut alternates = vec![];
        while self.at(&Token::KeywordOr) && self.peek_second()? == Token::KeywordCheck {
            self.advance()?;
            alternates.push(self.parse_guarded()?);
        }

        let fallback = if self.at(&Token::KeywordAlt) {
            self.advance()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::Check(CheckChain {
            primary,
            alternates,
            fallback,
        }))
    }

    /// `repeat [v in items]` or `repeat [v in start to end, step]`.
    pub(crate) fn parse_repeat(&mut self) -> Result<Stmt, CompileError> {
        trace!("Parser::parse_repeat()");
        self.eat(Token::KeywordRepeat)?;
        self.eat(Token::LBracket)?;
        let (var, _) = self.eat_identifier("a loop variable")?;
        self.eat(Token::KeywordIn).map_err(|e| e.with_note(loop_syntax()))?;

        let over_collection = matches!(self.peek(), Token::Identifier(_))
            && self.peek_second()? == Token::RBracket;
        if over_collection {
            let (collection, _) = self.eat_identifier("a collection name")?;
            self.eat(Token::RBracket)?;
            let body = self.parse_block()?;
            return Ok(Stmt::RepeatEach {
                var,
                collection,
                body,
            });
        }

        let start = self.parse_expression()?;
        self.eat(Token::KeywordTo).map_err(|e| e.with_note(loop_syntax()))?;
        let end = self.parse_expression()?;
        let step = if self.at(&Token::Comma) {
            self.advance()?;
            self.parse_expression()?
        } else {
            let here = self.span().start;
            (Expr::Number(1.0), here..here)
        };
        self.eat(Token::RBracket)?;
        let body = self.parse_block()?;

        Ok(Stmt::RepeatRange {
            var,
            start,
            end,
            step,
            body,
        })
    }

    pub(crate) fn parse_repeat_until(&mut self) -> Result<Stmt, CompileError> {
        self.eat(Token::KeywordRepeat)?;
        self.eat(Token::KeywordUntil)?;
        let condition = self.parse_bracketed_expression()?;
        let body = self.parse_block()?;
        Ok(Stmt::RepeatUntil { condition, body })
    }

    /// `for [init; condition; update v = ...] { ... }`
    pub(crate) fn parse_for(&mut self) -> Result<Stmt, CompileError> {
        trace!("Parser::parse_for()");
        self.eat(Token::KeywordFor)?;
        self.eat(Token::LBracket)?;

        let init_start = self.span().start;
        let init = match self.peek() {
            Token::KeywordAssign | Token::KeywordAll | Token::KeywordFix => {
                ForInit::Declare(self.parse_declaration()?)
            }
            Token::KeywordUpdate => ForInit::Update(self.parse_mutation()?),
            Token::Identifier(_) => ForInit::Identifier(self.eat_identifier("a loop variable")?.0),
            other => {
                return Err(CompileError::syntax(
                    format!("expected a declaration, update or variable to start the loop but found {other}"),
                    self.span(),
                ));
            }
        };
        let init = (init, init_start..self.previous_end());
        self.eat(Token::Semicolon)?;

        let condition = self.parse_expression()?;
        self.eat(Token::Semicolon)?;

        let increment_start = self.span().start;
        let increment = self.parse_mutation()?;
        let increment = (increment, increment_start..self.previous_end());
        self.eat(Token::RBracket)?;

        let body = self.parse_block()?;
        Ok(Stmt::For {
            init: Box::new(init),
            condition,
            increment: Box::new(increment),
            body,
        })
    }

    /// `make name[a, b] as type { ... }`
    pub(crate) fn parse_make(&mut self) -> Result<Stmt, CompileError> {
        trace!("Parser::parse_make()");
        self.eat(Token::KeywordMake)?;
        let (name, _) = self.eat_identifier("a function name after 'make'")?;

        self.eat(Token::LBracket)?;
        let mut params = vec![];
        if !self.at(&Token::RBracket) {
            params.push(self.eat_identifier("a parameter name")?.0);
            while self.at(&Token::Comma) {
                self.advance()?;
                params.push(self.eat_identifier("a parameter name")?.0);
            }
        }
        self.eat(Token::RBracket)?;

        let return_type = self.parse_type_annotation()?;
        let body = self.parse_block()?;

        Ok(Stmt::Function(Function {
            name,
            params,
            return_type,
            body,
        }))
    }

    /// `give`, `show`, `error` and `panic`: keyword, expression, `;`.
    pub(crate) fn parse_keyword_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.advance()?;
        let value = self.parse_expression()?;
        self.eat(Token::Semicolon)?;
        Ok(value)
    }
}
