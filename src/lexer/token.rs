use std::fmt;

/// Quoting character a string literal was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Backtick,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            '`' => Some(Quote::Backtick),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
            Quote::Backtick => '`',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    String,
    Int,
    Double,
    Bool,
    Array,
    Object,
    Null,
    Undefined,
}

impl DeclaredType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Int => "int",
            DeclaredType::Double => "double",
            DeclaredType::Bool => "bool",
            DeclaredType::Array => "array",
            DeclaredType::Object => "object",
            DeclaredType::Null => "null",
            DeclaredType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // literals
    Number(f64),
    Str(String, Quote),
    Bool(bool),
    Null,
    Undefined,
    Input,

    Identifier(String),
    Type(DeclaredType),
    Raw(String),

    // keywords
    KeywordAll,
    KeywordFix,
    KeywordAssign,
    KeywordUpdate,
    KeywordStore,
    KeywordMake,
    KeywordCall,
    KeywordGive,
    KeywordCheck,
    KeywordAlt,
    KeywordRepeat,
    KeywordUntil,
    KeywordIn,
    KeywordTo,
    KeywordOr,
    KeywordAnd,
    KeywordAs,
    KeywordShow,
    KeywordError,
    KeywordPanic,
    KeywordSkip,
    KeywordHalt,
    KeywordMethod,
    KeywordFor,

    // operators
    Assign,
    Plus,
    Minus,
    Star,
    Power,
    Slash,
    Modulo,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Arrow,

    // symbols
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Dot,
    Colon,

    Eof,
}

impl Token {
    /// Compares the kind of two tokens, ignoring any literal payload.
    pub fn same_kind(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = match self {
            Token::Number(n) => return write!(f, "number `{n}`"),
            Token::Str(s, q) => return write!(f, "string {q}{s}{q}", q = q.as_char()),
            Token::Bool(b) => return write!(f, "`{b}`"),
            Token::Identifier(name) => return write!(f, "identifier `{name}`"),
            Token::Type(ty) => return write!(f, "type `{ty}`"),
            Token::Raw(_) => return f.write_str("raw block"),
            Token::Eof => return f.write_str("end of file"),
            Token::Null => "null",
            Token::Undefined => "undefined",
            Token::Input => ":input",
            Token::KeywordAll => "all",
            Token::KeywordFix => "fix",
            Token::KeywordAssign => "assign",
            Token::KeywordUpdate => "update",
            Token::KeywordStore => "store",
            Token::KeywordMake => "make",
            Token::KeywordCall => "call",
            Token::KeywordGive => "give",
            Token::KeywordCheck => "check",
            Token::KeywordAlt => "alt",
            Token::KeywordRepeat => "repeat",
            Token::KeywordUntil => "until",
            Token::KeywordIn => "in",
            Token::KeywordTo => "to",
            Token::KeywordOr => "or",
            Token::KeywordAnd => "and",
            Token::KeywordAs => "as",
            Token::KeywordShow => "show",
            Token::KeywordError => "error",
            Token::KeywordPanic => "panic",
            Token::KeywordSkip => "skip",
            Token::KeywordHalt => "halt",
            Token::KeywordMethod => "method",
            Token::KeywordFor => "for",
            Token::Assign => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Power => "**",
            Token::Slash => "/",
            Token::Modulo => "%",
            Token::Greater => ">",
            Token::Less => "<",
            Token::GreaterEq => ">=",
            Token::LessEq => "<=",
            Token::Eq => "==",
            Token::StrictEq => "===",
            Token::NotEq => "!=",
            Token::StrictNotEq => "!==",
            Token::Arrow => "->",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Colon => ":",
        };
        write!(f, "'{spelling}'")
    }
}
