//! Parser module for test templates
//!
//! This module handles lexical analysis and parsing of template source into
//! the lossless template tree.

pub mod lexer;
pub mod parser;
pub mod error;

pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::Parser;
pub use error::{ParseError, ParseResult};

use crate::ast::CompilationUnit;
use crate::error::Result;

/// Parse template source into a compilation unit
pub fn parse_template(source: &str) -> Result<CompilationUnit> {
    parser::parse(source)
}
