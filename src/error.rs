/// Errors from the schema text parser.
///
/// Every variant carries the context path: the dotted list of grammar
/// productions that were active when parsing stopped, e.g. `.block.statement.value`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input while parsing [{context}]")]
    UnexpectedEndOfInput { context: String },

    #[error("unexpected token '{text}' while parsing [{context}], position [{line}:{column}]")]
    UnexpectedToken {
        context: String,
        text: String,
        line: usize,
        column: usize,
    },

    #[error("block nesting exceeds limit of {limit} while parsing [{context}], position [{line}:{column}]")]
    NestingTooDeep {
        context: String,
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// The dotted path of productions active at the point of failure.
    pub fn context(&self) -> &str {
        match self {
            ParseError::UnexpectedEndOfInput { context }
            | ParseError::UnexpectedToken { context, .. }
            | ParseError::NestingTooDeep { context, .. } => context,
        }
    }

    /// Source position of the offending token, if there was one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::UnexpectedEndOfInput { .. } => None,
            ParseError::UnexpectedToken { line, column, .. }
            | ParseError::NestingTooDeep { line, column, .. } => Some((*line, *column)),
        }
    }
}

/// Top-level error type for operations that read their input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for protolite operations.
pub type Result<T> = std::result::Result<T, Error>;
