use crate::lexer::token::DeclaredType;
use crate::lexer::token::DeclaredType::{Array, String as Text};

use self::Lowering::{Lambda, Slice, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowering {
    /// `{t}` is the target, `{0}`, `{1}`, ... the arguments.
    Template(&'static str),
    /// As `Template`, but the single argument must be a lambda literal.
    Lambda(&'static str),
    /// Decodes a slice-notation string literal.
    Slice,
}

#[derive(Debug)]
pub struct MethodEntry {
    pub target: DeclaredType,
    pub name: &'static str,
    pub arity: usize,
    pub lowering: Lowering,
}

const fn entry(target: DeclaredType, name: &'static str, arity: usize, lowering: Lowering) -> MethodEntry {
    MethodEntry {
        target,
        name,
        arity,
        lowering,
    }
}

static METHODS: &[MethodEntry] = &[
    entry(Array, "append", 1, Template("{t}.push({0})")),
    entry(
        Array,
        "remove",
        1,
        Template("((i) => i === -1 ? {t} : ({t}.splice(i, 1), {t}))({t}.indexOf({0}))"),
    ),
    entry(Array, "includes", 1, Template("{t}.includes({0})")),
    entry(Array, "filter", 1, Lambda("{t}.filter({0})")),
    entry(Array, "map", 1, Lambda("{t}.map({0})")),
    entry(Array, "join", 1, Template("{t}.join({0})")),
    entry(Array, "concat", 1, Template("{t}.concat({0})")),
    entry(Array, "sort", 0, Template("[...{t}].sort((a, b) => a - b)")),
    entry(
        Array,
        "sort_text",
        0,
        Template("[...{t}].sort((a, b) => String(a).localeCompare(String(b)))"),
    ),
    entry(Array, "min", 0, Template("Math.min(...{t})")),
    entry(Array, "max", 0, Template("Math.max(...{t})")),
    entry(Array, "size", 0, Template("{t}.length")),
    entry(Array, "slice", 1, Slice),
    entry(Text, "upper", 0, Template("{t}.toUpperCase()")),
    entry(Text, "lower", 0, Template("{t}.toLowerCase()")),
    entry(Text, "size", 0, Template("{t}.length")),
    entry(Text, "includes", 1, Template("{t}.includes({0})")),
    entry(Text, "concat", 1, Template("{t}.concat({0})")),
    entry(Text, "replace", 2, Template("{t}.replace({0}, {1})")),
    entry(Text, "replace_all", 2, Template("{t}.replaceAll({0}, {1})")),
    entry(Text, "slice", 1, Slice),
];

pub fn lookup(target: DeclaredType, name: &str) -> Option<&'static MethodEntry> {
    METHODS
        .iter()
        .find(|method| method.target == target && method.name == name)
}

/// Method names available on `target`, in table order.
pub fn names_for(target: DeclaredType) -> Vec<&'static str> {
    METHODS
        .iter()
        .filter(|method| method.target == target)
        .map(|method| method.name)
        .collect()
}

/// Fills `{t}` and `{N}` placeholders in one pass.
pub fn render(template: &str, target: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + target.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}');
        let replacement = close.and_then(|close| match &after[..close] {
            "t" => Some(target),
            key => key
                .parse::<usize>()
                .ok()
                .and_then(|n| args.get(n))
                .map(String::as_str),
        });
        match (replacement, close) {
            (Some(replacement), Some(close)) => {
                out.push_str(replacement);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceNotation {
    Range(Option<i64>, Option<i64>),
    Stride(u64),
    Reverse,
}

/// Accepts `start:end` (either side optional), `::step` and `::-1`.
pub fn decode_slice(notation: &str) -> Option<SliceNotation> {
    let notation = notation.trim();
    if let Some(step) = notation.strip_prefix("::") {
        return match step.trim().parse::<i64>().ok()? {
            -1 => Some(SliceNotation::Reverse),
            n if n > 0 => Some(SliceNotation::Stride(n as u64)),
            _ => None,
        };
    }

    let (start, end) = notation.split_once(':')?;
    let bound = |text: &str| -> Option<Option<i64>> {
        let text = text.trim();
        if text.is_empty() {
            Some(None)
        } else {
            text.parse::<i64>().ok().map(Some)
        }
    };
    Some(SliceNotation::Range(bound(start)?, bound(end)?))
}

pub fn lower_slice(target_type: DeclaredType, target: &str, slice: SliceNotation) -> String {
    let joined = if target_type == DeclaredType::String {
        ".join(\"\")"
    } else {
        ""
    };
    match slice {
        SliceNotation::Range(start, None) => format!("{target}.slice({})", start.unwrap_or(0)),
        SliceNotation::Range(start, Some(end)) => {
            format!("{target}.slice({}, {end})", start.unwrap_or(0))
        }
        SliceNotation::Stride(step) => {
            format!("[...{target}].filter((_, i) => i % {step} === 0){joined}")
        }
        SliceNotation::Reverse => format!("[...{target}].reverse(){joined}"),
    }
}
