use std::ops::{Deref, DerefMut};

use crate::error::ParseError;
use super::ast::*;
use super::lexer::Token;

/// Default limit on how deeply `{ }` blocks may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested `{ }` blocks below the root block.
    /// Each level costs a few native stack frames, so this bounds stack use on hostile input.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive-descent parser over a token list.
///
/// Each grammar production is one method. On entry a production pushes its
/// name onto the context stack; the returned [`Scope`] pops it again when it
/// goes out of scope, whether the production succeeded or bailed out with `?`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    context: Vec<&'static str>,
    depth: usize,
    options: ParseOptions,
}

/// Guard for one entry on the context stack.
struct Scope<'p> {
    parser: &'p mut Parser,
}

impl Deref for Scope<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.parser.context.pop();
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, options: ParseOptions) -> Self {
        Parser {
            tokens,
            pos: 0,
            context: Vec::new(),
            depth: 0,
            options,
        }
    }

    // Cursor primitives

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Return the current token and move past it; `None` at end of input.
    pub fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(tok)
    }

    /// Dotted path of the active productions, e.g. `.block.statement.value`.
    pub fn context_path(&self) -> String {
        self.context.iter().map(|c| format!(".{}", c)).collect()
    }

    fn enter(&mut self, name: &'static str) -> Scope<'_> {
        self.context.push(name);
        Scope { parser: self }
    }

    fn check(&self, f: impl Fn(&Token) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    fn advance_if(&mut self, f: impl Fn(&Token) -> bool) -> Option<Token> {
        if self.check(f) {
            self.advance()
        } else {
            None
        }
    }

    fn expect(&mut self, f: impl Fn(&Token) -> bool) -> Result<Token, ParseError> {
        match self.advance_if(f) {
            Some(tok) => Ok(tok),
            None => Err(self.complain()),
        }
    }

    /// Build the error for whatever sits under the cursor.
    fn complain(&self) -> ParseError {
        let context = self.context_path();
        match self.peek() {
            None => ParseError::UnexpectedEndOfInput { context },
            Some(tok) => ParseError::UnexpectedToken {
                context,
                text: tok.text.clone(),
                line: tok.line,
                column: tok.column,
            },
        }
    }

    // Grammar rules

    pub fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let mut p = self.enter("identifier");
        let token = p.expect(Token::is_identifier)?;
        Ok(Identifier { token })
    }

    /// `Identifier+`
    pub fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        let mut p = self.enter("instruction");
        let mut idents = Vec::new();

        while p.check(Token::is_identifier) {
            idents.push(p.parse_identifier()?);
        }

        if idents.is_empty() {
            return Err(p.complain());
        }
        Ok(Instruction { idents })
    }

    /// `Identifier ( '[' Identifier '=' Identifier ']' )?`
    pub fn parse_value(&mut self) -> Result<Value, ParseError> {
        let mut p = self.enter("value");
        let ident = p.parse_identifier()?;

        if !p.check(|t| t.is("[")) {
            return Ok(Value {
                ident,
                option: None,
            });
        }

        let option = p.parse_option()?;
        Ok(Value {
            ident,
            option: Some(option),
        })
    }

    fn parse_option(&mut self) -> Result<ValueOption, ParseError> {
        let mut p = self.enter("option");
        p.expect(|t| t.is("["))?;
        let key = p.parse_identifier()?;
        p.expect(|t| t.is("="))?;
        let value = p.parse_identifier()?;
        p.expect(|t| t.is("]"))?;
        Ok(ValueOption { key, value })
    }

    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let mut p = self.enter("statement");

        if let Some(token) = p.advance_if(Token::is_comment) {
            return Ok(Statement::Comment { token });
        }

        let instruction = p.parse_instruction()?;

        if p.advance_if(|t| t.is(";")).is_some() {
            return Ok(Statement::Declaration { instruction });
        }

        if p.advance_if(|t| t.is("=")).is_some() {
            let value = p.parse_value()?;
            p.expect(|t| t.is(";"))?;
            return Ok(Statement::Assignment { instruction, value });
        }

        if p.check(|t| t.is("{")) {
            if p.depth >= p.options.max_depth {
                return Err(p.too_deep());
            }
            p.advance();
            p.depth += 1;
            let block = p.parse_block();
            p.depth -= 1;
            let block = block?;
            p.expect(|t| t.is("}"))?;
            return Ok(Statement::Nested { instruction, block });
        }

        Err(p.complain())
    }

    /// Statements up to end of input or a `}`, which is left for the caller.
    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut p = self.enter("block");
        let mut statements = Vec::new();

        while !p.at_end() && !p.check(|t| t.is("}")) {
            statements.push(p.parse_statement()?);
        }

        Ok(Block { statements })
    }

    /// Parse the whole token list as the root block. Unlike nested blocks the
    /// root is not closed by a brace, so a stray `}` is an error.
    pub fn parse_root(&mut self) -> Result<Block, ParseError> {
        let block = self.parse_block()?;
        if !self.at_end() {
            let p = self.enter("block");
            return Err(p.complain());
        }
        Ok(block)
    }

    fn too_deep(&self) -> ParseError {
        let (line, column) = self.peek().map(|t| (t.line, t.column)).unwrap_or_default();
        ParseError::NestingTooDeep {
            context: self.context_path(),
            limit: self.options.max_depth,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_str(input: &str) -> Result<Block, ParseError> {
        Parser::new(tokenize(input)).parse_root()
    }

    fn words(stmt: &Statement) -> Vec<&str> {
        stmt.instruction().expect("statement has no instruction").words()
    }

    #[test]
    fn test_parse_empty() {
        let block = parse_str("").unwrap();
        assert!(block.is_empty());
        let block = parse_str("  \n\t ").unwrap();
        assert!(block.is_empty());
    }

    #[test]
    fn test_parse_declaration() {
        let block = parse_str("required string name;").unwrap();
        assert_eq!(block.len(), 1);
        match &block.statements[0] {
            Statement::Declaration { instruction } => {
                assert_eq!(instruction.words(), vec!["required", "string", "name"]);
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_empty_blocks() {
        let block = parse_str("message world {a{}}").unwrap();
        assert_eq!(block.len(), 1);
        match &block.statements[0] {
            Statement::Nested { instruction, block } => {
                assert_eq!(instruction.words(), vec!["message", "world"]);
                assert_eq!(block.len(), 1);
                match &block.statements[0] {
                    Statement::Nested { instruction, block } => {
                        assert_eq!(instruction.words(), vec!["a"]);
                        assert!(block.is_empty());
                    }
                    other => panic!("expected nested, got {:?}", other),
                }
            }
            other => panic!("expected nested, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_assignment_with_option() {
        let block = parse_str("optional int32 i = 1[default=100];").unwrap();
        assert_eq!(block.len(), 1);
        match &block.statements[0] {
            Statement::Assignment { instruction, value } => {
                assert_eq!(instruction.words(), vec!["optional", "int32", "i"]);
                assert_eq!(value.ident.text(), "1");
                let opt = value.option.as_ref().expect("option missing");
                assert_eq!(opt.key.text(), "default");
                assert_eq!(opt.value.text(), "100");
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_value() {
        let block = parse_str("repeated world w = 1;").unwrap();
        match &block.statements[0] {
            Statement::Assignment { value, .. } => {
                assert_eq!(value.ident.text(), "1");
                assert!(value.option.is_none());
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_message_body_in_order() {
        let schema = "message hello { message world { optional int32 i = 1[default=100]; } \
                      repeated world w = 1; optional int32 i = 2; }";
        let block = parse_str(schema).unwrap();
        assert_eq!(block.len(), 1);
        match &block.statements[0] {
            Statement::Nested { block, .. } => {
                assert_eq!(block.len(), 3);
                assert!(matches!(block.statements[0], Statement::Nested { .. }));
                assert!(matches!(block.statements[1], Statement::Assignment { .. }));
                assert!(matches!(block.statements[2], Statement::Assignment { .. }));
                assert_eq!(words(&block.statements[1]), vec!["repeated", "world", "w"]);
                assert_eq!(words(&block.statements[2]), vec!["optional", "int32", "i"]);
            }
            other => panic!("expected nested, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_comments() {
        let block = parse_str("// top\nmessage m {\n  // inner\n  a;\n}\n").unwrap();
        assert_eq!(block.len(), 2);
        match &block.statements[0] {
            Statement::Comment { token } => assert_eq!(token.text, "// top"),
            other => panic!("expected comment, got {:?}", other),
        }
        match &block.statements[1] {
            Statement::Nested { block, .. } => {
                assert_eq!(block.len(), 2);
                assert!(matches!(block.statements[0], Statement::Comment { .. }));
            }
            other => panic!("expected nested, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_instruction() {
        assert_eq!(
            parse_str("message"),
            Err(ParseError::UnexpectedEndOfInput {
                context: ".block.statement".into()
            })
        );
    }

    #[test]
    fn test_missing_instruction() {
        assert_eq!(
            parse_str("= 1;"),
            Err(ParseError::UnexpectedToken {
                context: ".block.statement.instruction".into(),
                text: "=".into(),
                line: 1,
                column: 1,
            })
        );
    }

    #[test]
    fn test_bad_lookahead_after_instruction() {
        assert_eq!(
            parse_str("a ]"),
            Err(ParseError::UnexpectedToken {
                context: ".block.statement".into(),
                text: "]".into(),
                line: 1,
                column: 3,
            })
        );
    }

    #[test]
    fn test_option_missing_value() {
        assert_eq!(
            parse_str("x = 1[default=];"),
            Err(ParseError::UnexpectedToken {
                context: ".block.statement.value.option.identifier".into(),
                text: "]".into(),
                line: 1,
                column: 15,
            })
        );
    }

    #[test]
    fn test_option_missing_close_bracket() {
        assert_eq!(
            parse_str("x = 1[default=100;"),
            Err(ParseError::UnexpectedToken {
                context: ".block.statement.value.option".into(),
                text: ";".into(),
                line: 1,
                column: 18,
            })
        );
    }

    #[test]
    fn test_assignment_missing_semicolon() {
        assert_eq!(
            parse_str("x = 1"),
            Err(ParseError::UnexpectedEndOfInput {
                context: ".block.statement".into()
            })
        );
    }

    #[test]
    fn test_unclosed_nested_block() {
        assert_eq!(
            parse_str("a { b; "),
            Err(ParseError::UnexpectedEndOfInput {
                context: ".block.statement".into()
            })
        );
    }

    #[test]
    fn test_quoted_string_is_not_identifier() {
        let err = parse_str("x = \"s\";").unwrap_err();
        assert_eq!(err.context(), ".block.statement.value.identifier");
    }

    #[test]
    fn test_stray_closing_brace_at_root() {
        assert_eq!(
            parse_str("message world { } }"),
            Err(ParseError::UnexpectedToken {
                context: ".block".into(),
                text: "}".into(),
                line: 1,
                column: 19,
            })
        );
    }

    #[test]
    fn test_trailing_whitespace_after_block() {
        let block = parse_str("message world { } ").unwrap();
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_context_unwound_after_failure() {
        let mut parser = Parser::new(tokenize("a = 1[k=v;"));
        assert!(parser.parse_statement().is_err());
        assert_eq!(parser.context_path(), "");

        let mut parser = Parser::new(tokenize("a;"));
        assert!(parser.parse_statement().is_ok());
        assert_eq!(parser.context_path(), "");
        assert!(parser.at_end());
    }

    #[test]
    fn test_cursor_primitives() {
        let mut parser = Parser::new(tokenize("a;"));
        assert_eq!(parser.peek().map(|t| t.text.as_str()), Some("a"));
        assert_eq!(parser.advance().map(|t| t.text), Some("a".to_string()));
        assert_eq!(parser.advance().map(|t| t.text), Some(";".to_string()));
        assert!(parser.at_end());
        assert!(parser.peek().is_none());
        assert!(parser.advance().is_none());
    }

    #[test]
    fn test_nesting_limit() {
        let opts = ParseOptions { max_depth: 2 };
        assert!(Parser::with_options(tokenize("a{b{}}"), opts).parse_root().is_ok());
        assert_eq!(
            Parser::with_options(tokenize("a{b{c{}}}"), opts).parse_root(),
            Err(ParseError::NestingTooDeep {
                context: ".block.statement.block.statement.block.statement".into(),
                limit: 2,
                line: 1,
                column: 6,
            })
        );
    }
}
