pub mod lexer;
pub mod ast;
pub mod grammar;

use std::io::Read;

use crate::error::ParseError;
use ast::Block;
use grammar::{ParseOptions, Parser};

/// Parse schema text into its root block.
///
/// This is the main entry point for the parser module. The first grammar
/// violation aborts the parse; no partial tree is returned.
pub fn parse(source: &str) -> Result<Block, ParseError> {
    parse_with(source, &ParseOptions::default())
}

/// Parse with explicit options.
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Block, ParseError> {
    Parser::with_options(lexer::tokenize(source), *options).parse_root()
}

/// Parse raw bytes. Invalid UTF-8 is replaced rather than rejected; the
/// replacement characters then fail to parse as identifiers.
pub fn parse_bytes(source: &[u8]) -> Result<Block, ParseError> {
    Parser::new(lexer::tokenize_bytes(source)).parse_root()
}

/// Read `reader` to the end and parse its contents.
pub fn parse_reader<R: Read>(mut reader: R) -> crate::error::Result<Block> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(parse_bytes(&buf)?)
}
