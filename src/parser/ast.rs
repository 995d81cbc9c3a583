//! Syntax tree produced by the parser.
//!
//! Nodes own copies of the tokens they were built from, so a tree outlives the
//! token stream and parser state it came from.

use super::lexer::Token;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A single identifier-class token. May stand for a keyword, a type name,
/// a number or a user symbol; the grammar does not tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Identifier {
    pub token: Token,
}

impl Identifier {
    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn same_shape(&self, other: &Identifier) -> bool {
        self.text() == other.text()
    }
}

/// A run of identifiers such as `optional int32 i`. Never empty when produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Instruction {
    pub idents: Vec<Identifier>,
}

impl Instruction {
    pub fn words(&self) -> Vec<&str> {
        self.idents.iter().map(Identifier::text).collect()
    }

    pub fn same_shape(&self, other: &Instruction) -> bool {
        self.idents.len() == other.idents.len()
            && self
                .idents
                .iter()
                .zip(&other.idents)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// The `[key=value]` suffix of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValueOption {
    pub key: Identifier,
    pub value: Identifier,
}

/// Right-hand side of an assignment: `ident` or `ident[key=value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Value {
    pub ident: Identifier,
    pub option: Option<ValueOption>,
}

impl Value {
    pub fn same_shape(&self, other: &Value) -> bool {
        self.ident.same_shape(&other.ident)
            && match (&self.option, &other.option) {
                (None, None) => true,
                (Some(a), Some(b)) => a.key.same_shape(&b.key) && a.value.same_shape(&b.value),
                _ => false,
            }
    }
}

/// One statement of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Statement {
    /// `Instruction ;`
    Declaration { instruction: Instruction },
    /// `Instruction = Value ;`
    Assignment { instruction: Instruction, value: Value },
    /// `Instruction { Block }`
    Nested { instruction: Instruction, block: Block },
    /// A `//` comment, kept verbatim.
    Comment { token: Token },
}

impl Statement {
    /// The leading instruction, absent only for comments.
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Statement::Declaration { instruction }
            | Statement::Assignment { instruction, .. }
            | Statement::Nested { instruction, .. } => Some(instruction),
            Statement::Comment { .. } => None,
        }
    }

    pub fn same_shape(&self, other: &Statement) -> bool {
        match (self, other) {
            (Statement::Declaration { instruction: a }, Statement::Declaration { instruction: b }) => {
                a.same_shape(b)
            }
            (
                Statement::Assignment { instruction: ia, value: va },
                Statement::Assignment { instruction: ib, value: vb },
            ) => ia.same_shape(ib) && va.same_shape(vb),
            (
                Statement::Nested { instruction: ia, block: ba },
                Statement::Nested { instruction: ib, block: bb },
            ) => ia.same_shape(ib) && ba.same_shape(bb),
            (Statement::Comment { token: a }, Statement::Comment { token: b }) => {
                a.text.trim_end() == b.text.trim_end()
            }
            _ => false,
        }
    }
}

/// An ordered list of statements. The root of every parse result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Structural equality that ignores token positions.
    pub fn same_shape(&self, other: &Block) -> bool {
        self.statements.len() == other.statements.len()
            && self
                .statements
                .iter()
                .zip(&other.statements)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Depth of the deepest nested block; a block without nested statements has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Nested { block, .. } => Some(block.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
