use crate::ast::BinOp;
use crate::lexer::token::{DeclaredType, Token};

use std::collections::HashMap;
use std::sync::LazyLock;

static STANDARD: LazyLock<Vocabulary> = LazyLock::new(Vocabulary::build);

/// Binary operator entry: source token, tree operator, binding power and
/// host spelling.
#[derive(Debug, Clone)]
pub struct BinaryEntry {
    pub token: Token,
    pub op: BinOp,
    pub precedence: u8,
    pub host: &'static str,
}

/// Immutable spelling tables shared by the lexer, parser and generator.
#[derive(Debug)]
pub struct Vocabulary {
    keywords: HashMap<&'static str, Token>,
    types: HashMap<&'static str, DeclaredType>,
    /// Sorted longest spelling first.
    operators: Vec<(&'static str, Token)>,
    binary: Vec<BinaryEntry>,
}

impl Vocabulary {
    pub fn standard() -> &'static Vocabulary {
        &STANDARD
    }

    fn build() -> Self {
        let keywords = HashMap::from([
            ("all", Token::KeywordAll),
            ("fix", Token::KeywordFix),
            ("assign", Token::KeywordAssign),
            ("update", Token::KeywordUpdate),
            ("store", Token::KeywordStore),
            ("make", Token::KeywordMake),
            ("call", Token::KeywordCall),
            ("give", Token::KeywordGive),
            ("check", Token::KeywordCheck),
            ("alt", Token::KeywordAlt),
            ("repeat", Token::KeywordRepeat),
            ("until", Token::KeywordUntil),
            ("in", Token::KeywordIn),
            ("to", Token::KeywordTo),
            ("or", Token::KeywordOr),
            ("and", Token::KeywordAnd),
            ("as", Token::KeywordAs),
            ("show", Token::KeywordShow),
            ("error", Token::KeywordError),
            ("panic", Token::KeywordPanic),
            ("skip", Token::KeywordSkip),
            ("halt", Token::KeywordHalt),
            ("method", Token::KeywordMethod),
            ("for", Token::KeywordFor),
        ]);

        let types = HashMap::from([
            ("string", DeclaredType::String),
            ("int", DeclaredType::Int),
            ("double", DeclaredType::Double),
            ("bool", DeclaredType::Bool),
            ("array", DeclaredType::Array),
            ("null", DeclaredType::Null),
            ("undefined", DeclaredType::Undefined),
            ("object", DeclaredType::Object),
        ]);

        let mut operators = vec![
            ("===", Token::StrictEq),
            ("!==", Token::StrictNotEq),
            ("==", Token::Eq),
            ("!=", Token::NotEq),
            (">=", Token::GreaterEq),
            ("<=", Token::LessEq),
            ("->", Token::Arrow),
            ("**", Token::Power),
            ("=", Token::Assign),
            ("+", Token::Plus),
            ("-", Token::Minus),
            ("*", Token::Star),
            ("/", Token::Slash),
            ("%", Token::Modulo),
            (">", Token::Greater),
            ("<", Token::Less),
            ("{", Token::LBrace),
            ("}", Token::RBrace),
            ("[", Token::LBracket),
            ("]", Token::RBracket),
            ("(", Token::LParen),
            (")", Token::RParen),
            (";", Token::Semicolon),
            (",", Token::Comma),
            (".", Token::Dot),
            (":", Token::Colon),
        ];
        operators.sort_by_key(|(spelling, _)| std::cmp::Reverse(spelling.len()));

        let entry = |token, op, precedence, host| BinaryEntry {
            token,
            op,
            precedence,
            host,
        };
        let binary = vec![
            entry(Token::KeywordOr, BinOp::Or, 1, "||"),
            entry(Token::KeywordAnd, BinOp::And, 2, "&&"),
            entry(Token::Eq, BinOp::Eq, 3, "=="),
            entry(Token::StrictEq, BinOp::StrictEq, 3, "==="),
            entry(Token::NotEq, BinOp::NotEq, 3, "!="),
            entry(Token::StrictNotEq, BinOp::StrictNotEq, 3, "!=="),
            entry(Token::Less, BinOp::Less, 3, "<"),
            entry(Token::Greater, BinOp::Greater, 3, ">"),
            entry(Token::LessEq, BinOp::LessEq, 3, "<="),
            entry(Token::GreaterEq, BinOp::GreaterEq, 3, ">="),
            entry(Token::Plus, BinOp::Add, 4, "+"),
            entry(Token::Minus, BinOp::Sub, 4, "-"),
            entry(Token::Star, BinOp::Mul, 5, "*"),
            entry(Token::Slash, BinOp::Div, 5, "/"),
            entry(Token::Modulo, BinOp::Mod, 5, "%"),
            entry(Token::Power, BinOp::Power, 5, "**"),
        ];

        Vocabulary {
            keywords,
            types,
            operators,
            binary,
        }
    }

    /// Classifies a word: keyword, then type name, then literal spelling,
    /// otherwise a plain identifier.
    pub fn classify_word(&self, word: &str) -> Token {
        if let Some(keyword) = self.keywords.get(word) {
            return keyword.clone();
        }
        if let Some(ty) = self.types.get(word) {
            return Token::Type(*ty);
        }
        match word {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            "null" => Token::Null,
            "undefined" => Token::Undefined,
            _ => Token::Identifier(word.to_string()),
        }
    }

    /// Longest operator spelling that prefixes `text`.
    pub fn match_operator(&self, text: &str) -> Option<(&'static str, Token)> {
        self.operators
            .iter()
            .find(|(spelling, _)| text.starts_with(spelling))
            .map(|(spelling, token)| (*spelling, token.clone()))
    }

    pub fn binary(&self, token: &Token) -> Option<&BinaryEntry> {
        self.binary.iter().find(|entry| entry.token.same_kind(token))
    }

    pub fn host_operator(&self, op: BinOp) -> &'static str {
        self.binary
            .iter()
            .find(|entry| entry.op == op)
            .map(|entry| entry.host)
            .unwrap_or("?")
    }
}
