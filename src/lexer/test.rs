use super::*;
use crate::error::Stage;
use crate::lexer::token::DeclaredType;

use pretty_assertions::assert_eq;

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input, Vocabulary::standard());
    let mut tokens = vec![];
    loop {
        let (token, _) = lexer.next_token().unwrap();
        if token == Token::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

fn lex_error(input: &str) -> CompileError {
    let mut lexer = Lexer::new(input, Vocabulary::standard());
    loop {
        match lexer.next_token() {
            Ok((Token::Eof, _)) => panic!("expected a lexical error in {input:?}"),
            Ok(_) => continue,
            Err(e) => return e,
        }
    }
}

#[test]
fn test_basic_tokens() {
    let tokens = lex_all("assign x as int = 5;");
    assert_eq!(
        tokens,
        vec![
            Token::KeywordAssign,
            Token::Identifier("x".to_string()),
            Token::KeywordAs,
            Token::Type(DeclaredType::Int),
            Token::Assign,
            Token::Number(5.0),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_word_classification_order() {
    let tokens = lex_all("store string true false null undefined name");
    assert_eq!(
        tokens,
        vec![
            Token::KeywordStore,
            Token::Type(DeclaredType::String),
            Token::Bool(true),
            Token::Bool(false),
            Token::Type(DeclaredType::Null),
            Token::Type(DeclaredType::Undefined),
            Token::Identifier("name".to_string()),
        ]
    );
}

#[test]
fn test_words_stop_at_digits() {
    assert_eq!(
        lex_all("row2 _tmp"),
        vec![
            Token::Identifier("row".to_string()),
            Token::Number(2.0),
            Token::Identifier("_tmp".to_string()),
        ]
    );
}

#[test]
fn test_numbers_take_one_decimal_point() {
    let tokens = lex_all("3.25 10 1.2.3");
    assert_eq!(
        tokens,
        vec![
            Token::Number(3.25),
            Token::Number(10.0),
            Token::Number(1.2),
            Token::Dot,
            Token::Number(3.0),
        ]
    );
}

#[test]
fn test_string_quote_styles() {
    let tokens = lex_all(r#""double" 'single' `back [x]`"#);
    assert_eq!(
        tokens,
        vec![
            Token::Str("double".to_string(), Quote::Double),
            Token::Str("single".to_string(), Quote::Single),
            Token::Str("back [x]".to_string(), Quote::Backtick),
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let tokens = lex_all("show 1; $ show 2;\nshow 3;");
    assert_eq!(
        tokens,
        vec![
            Token::KeywordShow,
            Token::Number(1.0),
            Token::Semicolon,
            Token::KeywordShow,
            Token::Number(3.0),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_operators_longest_first() {
    let tokens = lex_all("=== == = !== != >= > <= < -> - ** *");
    assert_eq!(
        tokens,
        vec![
            Token::StrictEq,
            Token::Eq,
            Token::Assign,
            Token::StrictNotEq,
            Token::NotEq,
            Token::GreaterEq,
            Token::Greater,
            Token::LessEq,
            Token::Less,
            Token::Arrow,
            Token::Minus,
            Token::Power,
            Token::Star,
        ]
    );
}

#[test]
fn test_input_marker_and_colon_fallback() {
    let tokens = lex_all("assign x = :input; method:int :inputs");
    assert_eq!(
        tokens,
        vec![
            Token::KeywordAssign,
            Token::Identifier("x".to_string()),
            Token::Assign,
            Token::Input,
            Token::Semicolon,
            Token::KeywordMethod,
            Token::Colon,
            Token::Type(DeclaredType::Int),
            Token::Colon,
            Token::Identifier("inputs".to_string()),
        ]
    );
}

#[test]
fn test_raw_block_is_verbatim() {
    let tokens = lex_all("@js :~ console.log(\"$ not a comment\"); ~: show 1;");
    assert_eq!(
        tokens[0],
        Token::Raw(" console.log(\"$ not a comment\"); ".to_string())
    );
    assert_eq!(tokens[1], Token::KeywordShow);
}

#[test]
fn test_spans_cover_whole_token() {
    let mut lexer = Lexer::new("x === `ab`", Vocabulary::standard());
    assert_eq!(lexer.next_token().unwrap().1, 0..1);
    assert_eq!(lexer.next_token().unwrap().1, 2..5);
    assert_eq!(lexer.next_token().unwrap().1, 6..10);
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("halt", Vocabulary::standard());
    assert_eq!(lexer.next_token().unwrap().0, Token::KeywordHalt);
    assert_eq!(lexer.next_token().unwrap().0, Token::Eof);
    assert_eq!(lexer.next_token().unwrap().0, Token::Eof);
}

#[test]
fn test_unterminated_string() {
    let error = lex_error("show \"oops;");
    assert_eq!(error.stage, Stage::Lex);
    assert_eq!(error.message, "unterminated string literal");
    assert_eq!(error.span, 5..6);
}

#[test]
fn test_malformed_raw_block() {
    let error = lex_error("@jx :~ code ~:");
    assert_eq!(error.stage, Stage::Lex);
    assert!(error.message.contains("malformed raw block"));

    let error = lex_error("@js :~ never closed");
    assert!(error.message.contains("unterminated raw block"));
}

#[test]
fn test_unknown_character() {
    let error = lex_error("assign x = 1 # 2;");
    assert_eq!(error.message, "unknown character `#`");
    assert_eq!(error.span, 13..14);

    let error = lex_error("check [!x]");
    assert_eq!(error.message, "unknown character `!`");
}
