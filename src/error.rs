use ariadne::{Color, ColorGenerator, Fmt, Label, Report, ReportKind, Source};
use yansi::Paint;

use std::fmt;
use std::io;
use std::ops::Range;
use std::process::ExitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Syntax,
    Generate,
}

impl Stage {
    fn code(self) -> &'static str {
        match self {
            Stage::Lex => "Lexical Error",
            Stage::Syntax => "Syntax Error",
            Stage::Generate => "Generation Error",
        }
    }
}

/// The single error a failed compilation reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub stage: Stage,
    pub message: String,
    pub span: Range<usize>,
    pub note: Option<String>,
}

impl CompileError {
    pub fn new(stage: Stage, message: impl Into<String>, span: Range<usize>) -> Self {
        CompileError {
            stage,
            message: message.into(),
            span,
            note: None,
        }
    }

    pub fn lex(message: impl Into<String>, span: Range<usize>) -> Self {
        Self::new(Stage::Lex, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Range<usize>) -> Self {
        Self::new(Stage::Syntax, message, span)
    }

    pub fn generate(message: impl Into<String>, span: Range<usize>) -> Self {
        Self::new(Stage::Generate, message, span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Moves the span by `offset` bytes, for errors raised while compiling
    /// a fragment embedded in a larger source.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }

    pub fn report(&self, file: &str) -> Report<'static, (String, Range<usize>)> {
        let file = file.to_string();
        let mut colors = ColorGenerator::new();
        let mut report = Report::build(ReportKind::Error, (file.clone(), self.span.clone()))
            .with_code(self.stage.code())
            .with_label(
                Label::new((file, self.span.clone()))
                    .with_message(&self.message)
                    .with_color(colors.next()),
            )
            .with_message(&self.message);
        if let Some(note) = &self.note {
            report = report.with_note(note);
        }
        report.finish()
    }

    /// Prints the diagnostic against `source` on stderr.
    pub fn eprint(&self, file: &str, source: &str) -> io::Result<()> {
        self.report(file)
            .eprint((file.to_string(), Source::from(source.to_string())))
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.stage.code(),
            self.span.start,
            self.span.end,
            self.message
        )
    }
}

impl std::error::Error for CompileError {}

/// Renders a syntax hint the way diagnostics notes show them.
pub fn syntax_hint(parts: &[(&str, bool)]) -> String {
    parts
        .iter()
        .map(|(text, keyword)| {
            if *keyword {
                format!("{}", Fmt::fg(*text, Color::Yellow).bold())
            } else {
                text.to_string()
            }
        })
        .collect()
}

#[derive(Debug)]
pub enum EpoxyError {
    Io(io::Error),
    Compile(CompileError),
    Host { command: String, source: io::Error },
    Failed(ExitStatus),
}

impl fmt::Display for EpoxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpoxyError::Io(e) => write!(f, "IO error: {}", e),
            EpoxyError::Compile(e) => write!(f, "{}", e),
            EpoxyError::Host { command, source } => {
                write!(f, "could not start host interpreter `{}`: {}", command, source)
            }
            EpoxyError::Failed(status) => write!(f, "program exited with {}", status),
        }
    }
}

impl std::error::Error for EpoxyError {}

impl From<io::Error> for EpoxyError {
    fn from(e: io::Error) -> Self {
        EpoxyError::Io(e)
    }
}

impl From<CompileError> for EpoxyError {
    fn from(e: CompileError) -> Self {
        EpoxyError::Compile(e)
    }
}
