use crate::ast::{Expr, MethodCall, Spanned, UnOp};
use crate::error::{CompileError, syntax_hint};
use crate::lexer::token::{DeclaredType, Token};
use crate::parser::Parser;

fn method_syntax() -> String {
    syntax_hint(&[
        ("the syntax for a method call is ", false),
        ("method", true),
        (":array items.filter[[x] -> x > 1] or ", false),
        ("method", true),
        (":string text.upper[]", false),
    ])
}

impl Parser<'_> {
    pub fn parse_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.parse_binary(1)
    }

    /// Precedence climbing over the vocabulary's binary operator table;
    /// every level is left associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Spanned<Expr>, CompileError> {
        let mut l_expr = self.parse_unary()?;

        loop {
            let Some(entry) = self.vocab().binary(self.peek()) else {
                break;
            };
            if entry.precedence < min_precedence {
                break;
            }
            let (operator, precedence) = (entry.op, entry.precedence);
            self.advance()?;

            let r_expr = self.parse_binary(precedence + 1)?;
            let span = l_expr.1.start..r_expr.1.end;
            l_expr = (
                Expr::BinOp {
                    operator,
                    l_value: Box::new(l_expr),
                    r_value: Box::new(r_expr),
                },
                span,
            );
        }

        Ok(l_expr)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let unop = match self.peek() {
            Token::Minus => UnOp::Minus,
            Token::Plus => UnOp::Plus,
            _ => return self.parse_primary(),
        };
        let (_, span) = self.advance()?;
        let expression = self.parse_unary()?;
        let span = span.start..expression.1.end;
        Ok((
            Expr::UnOp {
                unop,
                expression: Box::new(expression),
            },
            span,
        ))
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        match self.peek() {
            Token::Identifier(_) => return self.parse_identifier(),
            Token::LBracket => return self.parse_bracketed(),
            Token::LBrace => return self.parse_array(),
            Token::KeywordCall => return self.parse_call(),
            Token::KeywordMethod => return self.parse_method(),
            _ => {}
        }

        let (token, span) = self.advance()?;
        let expr = match token {
            Token::Number(n) => Expr::Number(n),
            Token::Str(s, quote) => Expr::Str(s, quote),
            Token::Bool(b) => Expr::Bool(b),
            Token::Null | Token::Type(DeclaredType::Null) => Expr::Null,
            Token::Undefined | Token::Type(DeclaredType::Undefined) => Expr::Undefined,
            Token::Input => Expr::Input,
            Token::LParen => {
                let (inner, _) = self.parse_expression()?;
                self.eat(Token::RParen)?;
                return Ok((inner, span.start..self.previous_end()));
            }
            other => {
                return Err(CompileError::syntax(
                    format!("expected an expression but found {other}"),
                    span,
                ));
            }
        };
        Ok((expr, span))
    }

    /// Identifier, `name{index}`, or the bracketless lambda `name -> expr`.
    fn parse_identifier(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let (name, span) = self.eat_identifier("an identifier")?;

        if self.at(&Token::Arrow) {
            self.advance()?;
            let body = self.parse_expression()?;
            let span = span.start..body.1.end;
            return Ok((
                Expr::Lambda {
                    params: vec![name],
                    body: Box::new(body),
                },
                span,
            ));
        }

        if self.at(&Token::LBrace) {
            self.advance()?;
            let index = self.parse_expression()?;
            self.eat(Token::RBrace)?;
            return Ok((
                Expr::Index {
                    target: Box::new((Expr::Identifier(name), span.clone())),
                    index: Box::new(index),
                },
                span.start..self.previous_end(),
            ));
        }

        Ok((Expr::Identifier(name), span))
    }

    /// `[a, b] -> expr` when the arrow follows, otherwise `[expr]`.
    fn parse_bracketed(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.span().start;

        let params = self.attempt(|parser| {
            parser.eat(Token::LBracket)?;
            let mut params = vec![];
            if !parser.at(&Token::RBracket) {
                params.push(parser.eat_identifier("a lambda parameter")?.0);
                while parser.at(&Token::Comma) {
                    parser.advance()?;
                    params.push(parser.eat_identifier("a lambda parameter")?.0);
                }
            }
            parser.eat(Token::RBracket)?;
            parser.eat(Token::Arrow)?;
            Ok(params)
        });

        if let Some(params) = params {
            let body = self.parse_expression()?;
            let span = start..body.1.end;
            return Ok((
                Expr::Lambda {
                    params,
                    body: Box::new(body),
                },
                span,
            ));
        }

        self.eat(Token::LBracket)?;
        let (inner, _) = self.parse_expression()?;
        self.eat(Token::RBracket)?;
        Ok((inner, start..self.previous_end()))
    }

    fn parse_array(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.eat(Token::LBrace)?.start;
        let mut elements = vec![];
        if !self.at(&Token::RBrace) {
            elements.push(self.parse_expression()?);
            while self.at(&Token::Comma) {
                self.advance()?;
                elements.push(self.parse_expression()?);
            }
        }
        self.eat(Token::RBrace)?;
        Ok((Expr::Array(elements), start..self.previous_end()))
    }

    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.eat(Token::LBracket)?;
        let mut args = vec![];
        if !self.at(&Token::RBracket) {
            args.push(self.parse_expression()?);
            while self.at(&Token::Comma) {
                self.advance()?;
                args.push(self.parse_expression()?);
            }
        }
        self.eat(Token::RBracket)?;
        Ok(args)
    }

    /// `call name[args]`
    fn parse_call(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.eat(Token::KeywordCall)?.start;
        let (name, _) = self.eat_identifier("a function name after 'call'")?;
        let args = self.parse_arguments()?;
        Ok((Expr::Call { name, args }, start..self.previous_end()))
    }

    /// `method:type target.name[args]`
    fn parse_method(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.eat(Token::KeywordMethod)?.start;
        self.eat(Token::Colon)
            .map_err(|e| e.with_note(method_syntax()))?;

        let target_type = match self.advance()? {
            (Token::Type(ty), span) => (ty, span),
            (other, span) => {
                return Err(CompileError::syntax(
                    format!("expected a target type after 'method:' but found {other}"),
                    span,
                )
                .with_note(method_syntax()));
            }
        };

        let (target, _) = self.eat_identifier("the variable the method is called on")?;
        self.eat(Token::Dot)
            .map_err(|e| e.with_note(method_syntax()))?;
        let method = self.eat_identifier("a method name")?;
        let args = self.parse_arguments()?;

        Ok((
            Expr::Method(MethodCall {
                target_type,
                target,
                method,
                args,
            }),
            start..self.previous_end(),
        ))
    }
}
