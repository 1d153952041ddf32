pub mod ast;
pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use driver::{compile, run, translate};
