/// Marker that opens a line comment.
pub const COMMENT_MARKER: &str = "//";

/// A token with its source location.
///
/// Tokens carry no kind tag: whether `=` or `int32` is meaningful depends on
/// the production asking, so classification is done through the predicates below.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub text: String,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column (in characters) of the first character.
    pub column: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            text: text.into(),
            line,
            column,
        }
    }

    /// True if the whole text is made of identifier-class characters.
    pub fn is_identifier(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(is_ident_char)
    }

    pub fn is_comment(&self) -> bool {
        self.text.starts_with(COMMENT_MARKER)
    }

    /// True if the text is exactly `s`.
    pub fn is(&self, s: &str) -> bool {
        self.text == s
    }
}

/// Characters that may appear in an identifier: `[A-Za-z0-9.\-_()]`.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '(' | ')')
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Tokenizer for schema text.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.input.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    fn read_while(&mut self, text: &mut String, keep: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !keep(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
    }

    fn read_string(&mut self, text: &mut String) {
        // Opening quote.
        if let Some(q) = self.advance() {
            text.push(q);
        }
        // An unterminated string stops before the newline.
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                return;
            }
            text.push(c);
            self.advance();
            match c {
                '"' => return,
                '\\' => {
                    if let Some(escaped) = self.peek_char().filter(|&e| e != '\n') {
                        text.push(escaped);
                        self.advance();
                    }
                }
                _ => {}
            }
        }
    }

    /// Read the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);
        let c = self.peek_char()?;
        let mut text = String::new();

        match c {
            '/' if self.peek_second() == Some('/') => {
                self.read_while(&mut text, |c| c != '\n' && c != '\r');
            }
            '"' => self.read_string(&mut text),
            c if is_ident_char(c) => self.read_while(&mut text, is_ident_char),
            c => {
                text.push(c);
                self.advance();
            }
        }

        Some(Token { text, line, column })
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Split `input` into tokens. Never fails; malformed input is left for the parser to reject.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Like [`tokenize`], decoding the bytes as UTF-8 and replacing invalid sequences with U+FFFD.
pub fn tokenize_bytes(input: &[u8]) -> Vec<Token> {
    tokenize(&String::from_utf8_lossy(input))
}
