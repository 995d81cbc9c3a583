//! Protolite: a front-end for a small protobuf-like schema language.
//!
//! Source text is split into position-tagged tokens by the lexer and then
//! turned into a tree of blocks and statements by a recursive-descent parser.
//! The grammar is deliberately loose: a statement is a run of identifiers
//! followed by `;`, `= value;` or a nested `{ block }`.
//!
//! # Quick Start
//!
//! ```rust
//! use protolite::parser;
//! use protolite::parser::ast::Statement;
//!
//! let block = parser::parse(r#"
//!     message Person {
//!         optional int32 age = 1[default=0];
//!         repeated string email = 2;
//!     }
//! "#).unwrap();
//!
//! assert_eq!(block.len(), 1);
//! match &block.statements[0] {
//!     Statement::Nested { instruction, block } => {
//!         assert_eq!(instruction.words(), vec!["message", "Person"]);
//!         assert_eq!(block.len(), 2);
//!     }
//!     _ => unreachable!(),
//! }
//!
//! let text = protolite::format::render(&block);
//! assert!(text.starts_with("message Person {\n"));
//! ```

pub mod error;
pub mod parser;
pub mod format;

pub use error::{Error, ParseError};
pub use format::{render, FormatOptions, Formatter};
pub use parser::ast::{Block, Identifier, Instruction, Statement, Value, ValueOption};
pub use parser::grammar::ParseOptions;
pub use parser::lexer::{tokenize, Token};
pub use parser::{parse, parse_bytes, parse_reader, parse_with};
