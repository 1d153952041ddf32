use crate::codegen::{Generated, JsGenerator};
use crate::config::Config;
use crate::error::{CompileError, EpoxyError};
use crate::lexer::vocab::Vocabulary;
use crate::parser::Parser;
use crate::runtime::{self, host::Host};

use tracing::{debug, instrument};

/// Lexes, parses and generates `source` with the standard vocabulary.
pub fn compile(source: &str) -> Result<Generated, CompileError> {
    compile_with(source, Vocabulary::standard())
}

#[instrument(skip_all, fields(bytes = source.len()))]
pub fn compile_with(source: &str, vocab: &Vocabulary) -> Result<Generated, CompileError> {
    let mut parser = Parser::from_source(source, vocab)?;
    let program = parser.parse_program()?;
    debug!(statements = program.statements.len(), "parsed program");
    JsGenerator::new(vocab).generate(&program)
}

/// Complete host text, preambles included.
pub fn translate(source: &str) -> Result<String, CompileError> {
    compile(source).map(|generated| runtime::assemble(&generated))
}

/// Translates `source` and either prints it or executes it on the
/// configured host.
pub fn run(source: &str, config: &Config) -> Result<(), EpoxyError> {
    let script = translate(source)?;
    if config.emit {
        print!("{script}");
        return Ok(());
    }

    let status = Host::new(config.host.as_str()).run(&script)?;
    debug!(%status, "host finished");
    if status.success() {
        Ok(())
    } else {
        Err(EpoxyError::Failed(status))
    }
}
