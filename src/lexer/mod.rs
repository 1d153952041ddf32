pub mod token;
pub mod vocab;

#[cfg(test)]
pub mod test;

use crate::error::CompileError;
use token::{Quote, Token};
use vocab::Vocabulary;

use logos::Logos;

use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawError {
    #[default]
    UnrecognizedCharacter,
    UnterminatedString,
    MalformedRawOpen,
    UnterminatedRawBlock,
}

/// Character classes; spellings are resolved against the [`Vocabulary`].
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\$[^\n]*")]
enum RawToken {
    #[regex(r"[a-zA-Z_]+")]
    Word,

    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,

    #[regex(r#"["'`]"#, quoted)]
    Quoted(String),

    #[token("@", raw_block)]
    Raw(String),

    #[regex(r"[=!<>+\-*/%{}\[\]();,.:]")]
    Symbol,
}

fn quoted(lex: &mut logos::Lexer<RawToken>) -> Result<String, RawError> {
    let quote = lex.slice();
    let rest = lex.remainder();
    let Some(end) = rest.find(quote) else {
        lex.bump(rest.len());
        return Err(RawError::UnterminatedString);
    };
    let content = rest[..end].to_string();
    lex.bump(end + quote.len());
    Ok(content)
}

/// `@js :~ ... ~:`, captured verbatim.
fn raw_block(lex: &mut logos::Lexer<RawToken>) -> Result<String, RawError> {
    let rest = lex.remainder();
    let Some(after_js) = rest.strip_prefix("js") else {
        return Err(RawError::MalformedRawOpen);
    };
    let Some(body) = after_js.trim_start().strip_prefix(":~") else {
        return Err(RawError::MalformedRawOpen);
    };
    let opener = rest.len() - body.len();
    let Some(end) = body.find("~:") else {
        lex.bump(rest.len());
        return Err(RawError::UnterminatedRawBlock);
    };
    let code = body[..end].to_string();
    lex.bump(opener + end + 2);
    Ok(code)
}

/// On-demand token source. Cloning it snapshots the cursor.
#[derive(Clone)]
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, RawToken>,
    vocab: &'src Vocabulary,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, vocab: &'src Vocabulary) -> Self {
        Lexer {
            inner: RawToken::lexer(source),
            vocab,
        }
    }

    pub fn vocab(&self) -> &'src Vocabulary {
        self.vocab
    }

    /// Returns the next token; keeps returning [`Token::Eof`] once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Result<(Token, Range<usize>), CompileError> {
        let Some(raw) = self.inner.next() else {
            let end = self.inner.source().len();
            return Ok((Token::Eof, end..end));
        };
        let span = self.inner.span();
        let slice = self.inner.slice();

        let raw = match raw {
            Ok(raw) => raw,
            Err(kind) => return Err(self.error(kind, span)),
        };

        let token = match raw {
            RawToken::Word => self.vocab.classify_word(slice),
            RawToken::Number => match slice.parse::<f64>() {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    return Err(CompileError::lex(
                        format!("malformed number literal `{slice}`"),
                        span,
                    ));
                }
            },
            RawToken::Quoted(content) => {
                let quote = slice.chars().next().and_then(Quote::from_char);
                Token::Str(content, quote.unwrap_or(Quote::Double))
            }
            RawToken::Raw(code) => Token::Raw(code),
            RawToken::Symbol => return self.symbol(span),
        };
        Ok((token, self.inner.span()))
    }

    fn symbol(&mut self, span: Range<usize>) -> Result<(Token, Range<usize>), CompileError> {
        let start = span.start;
        let text = &self.inner.source()[start..];

        if text.starts_with(":i") {
            let word: String = text[1..]
                .chars()
                .take_while(|c| c.is_ascii_alphabetic() || *c == '_')
                .collect();
            if word == "input" {
                self.inner.bump(word.len());
                return Ok((Token::Input, self.inner.span()));
            }
        }

        let Some((spelling, token)) = self.vocab.match_operator(text) else {
            let c = text.chars().next().unwrap_or('?');
            return Err(CompileError::lex(format!("unknown character `{c}`"), span)
                .with_note("this character does not start any token"));
        };
        self.inner.bump(spelling.len() - 1);
        Ok((token, self.inner.span()))
    }

    fn error(&self, kind: RawError, span: Range<usize>) -> CompileError {
        match kind {
            RawError::UnrecognizedCharacter => {
                let c = self.inner.slice().chars().next().unwrap_or('?');
                CompileError::lex(format!("unknown character `{c}`"), span)
                    .with_note("this character does not start any token")
            }
            RawError::UnterminatedString => {
                CompileError::lex("unterminated string literal", span.start..span.start + 1)
                    .with_note("strings end at the next occurrence of their opening quote")
            }
            RawError::MalformedRawOpen => CompileError::lex(
                "malformed raw block delimiter, expected `@js :~`",
                span,
            ),
            RawError::UnterminatedRawBlock => CompileError::lex(
                "unterminated raw block, missing closing `~:`",
                span.start..span.start + 1,
            ),
        }
    }
}
