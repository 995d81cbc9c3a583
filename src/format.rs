//! Renders a parsed [`Block`] back to schema text.
//!
//! The output always re-parses to a tree of the same shape, and rendering
//! that tree again yields the same text.

use std::fmt;

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::grammar::ParseOptions;
use crate::parser::parse_with;

/// Formatter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { indent_width: 4 }
    }
}

/// Pretty-printer for syntax trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new() -> Self {
        Formatter::default()
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Formatter { options }
    }

    /// Render `block` as a top-level document. Every statement ends with a newline.
    pub fn render(&self, block: &Block) -> String {
        let mut out = String::new();
        self.write_block(&mut out, block, 0);
        out
    }

    /// True if `source` parses and is already laid out exactly as [`Formatter::render`] would print it.
    pub fn check(&self, source: &str, options: &ParseOptions) -> Result<bool, ParseError> {
        let block = parse_with(source, options)?;
        Ok(self.render(&block) == source)
    }

    fn indent(&self, out: &mut String, level: usize) {
        out.extend(std::iter::repeat(' ').take(level * self.options.indent_width));
    }

    fn write_block(&self, out: &mut String, block: &Block, level: usize) {
        for stmt in block {
            self.indent(out, level);
            self.write_statement(out, stmt, level);
            out.push('\n');
        }
    }

    fn write_statement(&self, out: &mut String, stmt: &Statement, level: usize) {
        match stmt {
            Statement::Declaration { instruction } => {
                write_instruction(out, instruction);
                out.push(';');
            }
            Statement::Assignment { instruction, value } => {
                write_instruction(out, instruction);
                out.push_str(" = ");
                write_value(out, value);
                out.push(';');
            }
            Statement::Nested { instruction, block } => {
                write_instruction(out, instruction);
                if block.is_empty() {
                    out.push_str(" {}");
                } else {
                    out.push_str(" {\n");
                    self.write_block(out, block, level + 1);
                    self.indent(out, level);
                    out.push('}');
                }
            }
            Statement::Comment { token } => out.push_str(token.text.trim_end()),
        }
    }
}

fn write_instruction(out: &mut String, instruction: &Instruction) {
    out.push_str(&instruction.words().join(" "));
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str(value.ident.text());
    if let Some(opt) = &value.option {
        out.push('[');
        out.push_str(opt.key.text());
        out.push('=');
        out.push_str(opt.value.text());
        out.push(']');
    }
}

/// Render with default options.
pub fn render(block: &Block) -> String {
    Formatter::new().render(block)
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_instruction(&mut out, self);
        f.write_str(&out)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_value(&mut out, self);
        f.write_str(&out)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        Formatter::new().write_statement(&mut out, self, 0);
        f.write_str(&out)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
