//! Definitions related to tokens.

use crate::source::InputSpan;

/// All information carried by a token except the input span that it covers.
pub trait TokenPayload {
    /// Create an instance that signifies a tokenizer error.
    fn error() -> Self;
}

/// Represents a token: a sequence of characters on the input atomic from a parser perspective.
#[derive(Clone, Debug)]
pub struct Token<Payload: TokenPayload> {
    pub span: InputSpan,
    pub payload: Payload,

    /// The exact text covered by the token.
    pub lexeme: String,

    /// Whether there is a line break between this token and the previous one. The parser uses
    /// this to find statement boundaries.
    pub preceded_by_newline: bool,
}

impl<Payload: TokenPayload> Token<Payload> {
    pub fn new(
        span: InputSpan,
        payload: Payload,
        lexeme: String,
        preceded_by_newline: bool,
    ) -> Token<Payload> {
        Token {
            span,
            payload,
            lexeme,
            preceded_by_newline,
        }
    }
}
