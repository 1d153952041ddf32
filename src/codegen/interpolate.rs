use crate::codegen::{Generated, JsGenerator};
use crate::error::CompileError;
use crate::lexer::vocab::Vocabulary;
use crate::parser::Parser;

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    /// Inner text of a `[ ]` region and its byte offset in the enclosing
    /// source.
    Region { source: String, offset: usize },
}

/// Splits template text into literal text and balanced `[ ]` regions.
/// A `]` outside any region is ordinary text.
pub fn split_regions(text: &str, offset: usize) -> Result<Vec<Segment>, CompileError> {
    let mut segments = vec![];
    let mut literal = String::new();
    let mut chars = text.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '[' {
            literal.push(c);
            continue;
        }

        let mut depth = 1;
        let mut close = None;
        for (j, c) in chars.by_ref() {
            match c {
                '[' => depth += 1,
                ']' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                close = Some(j);
                break;
            }
        }
        let Some(close) = close else {
            return Err(CompileError::generate(
                "unmatched '[' in interpolated string",
                offset + i..offset + i + 1,
            )
            .with_note("every interpolation region must be closed with ']'"));
        };

        if !literal.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut literal)));
        }
        let inner = &text[i + 1..close];
        let leading = inner.len() - inner.trim_start().len();
        segments.push(Segment::Region {
            source: inner.trim().to_string(),
            offset: offset + i + 1 + leading,
        });
    }

    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    Ok(segments)
}

/// Compiles one region with a fresh parser and generator; nothing is
/// shared with the caller's generation pass.
pub fn compile_region(vocab: &Vocabulary, source: &str, offset: usize) -> Result<Generated, CompileError> {
    if source.is_empty() {
        return Err(CompileError::generate(
            "empty interpolation region",
            offset.saturating_sub(1)..offset + 1,
        ));
    }
    let expr = Parser::from_source(source, vocab)
        .and_then(|mut parser| parser.parse_standalone_expression())
        .map_err(|e| e.shifted(offset))?;
    JsGenerator::new(vocab)
        .generate_expression(&expr)
        .map_err(|e| e.shifted(offset))
}

/// Rejects the word `call` anywhere outside `[ ]` regions.
pub fn reject_bare_calls(text: &str, offset: usize) -> Result<(), CompileError> {
    let bytes = text.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'c' if depth == 0 && text[i..].starts_with("call") => {
                let before = i.checked_sub(1).map(|p| bytes[p]);
                let after = bytes.get(i + 4).copied();
                if !before.is_some_and(is_word) && !after.is_some_and(is_word) {
                    return Err(CompileError::generate(
                        "function calls in a template string must be inside [ ] interpolation",
                        offset + i..offset + i + 4,
                    )
                    .with_note("write `[call name[args]]` to interpolate the result"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Escapes literal template text for a host template literal. Source
/// strings have no escape sequences, so backslashes are kept literally.
pub fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
