//! Cursor over the token vector produced by the tokenizer.

use crate::parser::tokens::primary::{PrimaryToken, TokenKind};
use crate::parser::{ParseResult, SyntaxError};
use crate::source::InputSpan;

pub struct TokenStream {
    tokens: Vec<PrimaryToken>,
    position: usize,
}

impl TokenStream {
    /// `tokens` must end with a `TokenKind::Eof` token.
    pub fn new(tokens: Vec<PrimaryToken>) -> TokenStream {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> &PrimaryToken {
        self.peek_nth(0)
    }

    /// Looks `n` tokens ahead. Reads past the end yield the final `Eof` token.
    pub fn peek_nth(&self, n: usize) -> &PrimaryToken {
        let index = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().payload
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Like `at`, but only if the token is on the same line as the previous one.
    pub fn at_on_same_line(&self, kind: TokenKind) -> bool {
        self.at(kind) && !self.peek().preceded_by_newline
    }

    /// Consumes the current token. `Eof` is never consumed.
    pub fn next(&mut self) -> PrimaryToken {
        let token = self.peek().clone();
        if token.payload != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<PrimaryToken> {
        if self.at(kind) {
            Some(self.next())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParseResult<PrimaryToken> {
        self.eat(kind).ok_or_else(|| self.unexpected(expected))
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> InputSpan {
        if self.position == 0 {
            self.peek().span
        } else {
            self.tokens[self.position - 1].span
        }
    }

    /// Zero-width span right after the most recently consumed token.
    pub fn after_previous(&self) -> InputSpan {
        if self.position == 0 {
            let span = self.peek().span;
            return InputSpan {
                end: span.start,
                ..span
            };
        }

        let token = &self.tokens[self.position - 1];
        token.span.after(&token.lexeme)
    }

    /// Error describing the current token as unexpected.
    pub fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let token = self.peek();
        match token.payload {
            TokenKind::Error => SyntaxError::InvalidCharacter {
                lexeme: token.lexeme.clone(),
                span: token.span,
            },
            found => SyntaxError::UnexpectedToken {
                found,
                lexeme: token.lexeme.clone(),
                expected,
                span: token.span,
            },
        }
    }
}
