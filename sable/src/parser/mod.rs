//! Parser producing the AST from a token stream.
//!
//! This is a hand-written recursive descent parser. Parsing routines are methods on `Parser`,
//! grouped into submodules by the part of the grammar they handle. Each routine returns a
//! `ParseResult`; errors bubble up to the nearest top-level definition, where the parser
//! records them and skips to the next definition, so several syntax errors can be found in
//! one run.

mod expressions;
mod globals;
mod stream;
mod type_expr;

pub mod tokens;

use crate::ast;
use crate::ast::TypeDefKind;
use crate::source::InputSpan;
use stream::TokenStream;
use tokens::primary::{PrimaryToken, TokenKind};

pub use tokens::tokenize;

/// A syntax error found in the user program.
#[derive(Debug, Clone)]
pub enum SyntaxError {
    UnexpectedToken {
        found: TokenKind,
        lexeme: String,
        expected: &'static str,
        span: InputSpan,
    },
    InvalidCharacter {
        lexeme: String,
        span: InputSpan,
    },
    InvalidLiteral {
        lexeme: String,
        span: InputSpan,
    },
    IllegalModifier {
        modifier: &'static str,
        target: &'static str,
        span: InputSpan,
    },
    ParametersNotAllowed {
        kind: TypeDefKind,
        span: InputSpan,
    },
}

impl SyntaxError {
    pub fn span(&self) -> InputSpan {
        match self {
            SyntaxError::UnexpectedToken { span, .. } => *span,
            SyntaxError::InvalidCharacter { span, .. } => *span,
            SyntaxError::InvalidLiteral { span, .. } => *span,
            SyntaxError::IllegalModifier { span, .. } => *span,
            SyntaxError::ParametersNotAllowed { span, .. } => *span,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SyntaxError::UnexpectedToken {
                found,
                lexeme,
                expected,
                ..
            } => match found {
                TokenKind::Identifier
                | TokenKind::OperatorIdentifier
                | TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral => {
                    format!("expected {}, found {} `{}`", expected, found, lexeme)
                }
                _ => format!("expected {}, found {}", expected, found),
            },
            SyntaxError::InvalidCharacter { lexeme, .. } => {
                format!("unrecognized character `{}`", lexeme)
            }
            SyntaxError::InvalidLiteral { lexeme, .. } => format!("invalid literal `{}`", lexeme),
            SyntaxError::IllegalModifier {
                modifier, target, ..
            } => format!("`{}` modifier is not allowed on {}", modifier, target),
            SyntaxError::ParametersNotAllowed { kind, .. } => {
                format!("{}s cannot have constructor parameters", kind.keyword())
            }
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a whole token stream, constructing an `ast::Program`.
pub fn parse(tokens: Vec<PrimaryToken>) -> Result<ast::Program, Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();

    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

struct Parser {
    stream: TokenStream,
    errors: Vec<SyntaxError>,
}

impl Parser {
    fn new(tokens: Vec<PrimaryToken>) -> Parser {
        Parser {
            stream: TokenStream::new(tokens),
            errors: Vec::new(),
        }
    }

    fn parse_program(&mut self) -> ast::Program {
        let mut program = ast::Program::new();

        loop {
            while self.stream.eat(TokenKind::Semicolon).is_some() {}
            if self.stream.at(TokenKind::Eof) {
                break;
            }

            match self.parse_type_def() {
                Ok(type_def) => program.definitions.push(type_def),
                Err(error) => {
                    self.errors.push(error);
                    self.recover_to_next_definition();
                }
            }
        }

        program
    }

    /// Skips tokens until something that looks like the start of a top-level definition at the
    /// beginning of a line. Always consumes at least one token.
    fn recover_to_next_definition(&mut self) {
        self.stream.next();

        while !self.stream.at(TokenKind::Eof) {
            if self.stream.peek().preceded_by_newline && self.at_definition_start() {
                return;
            }
            self.stream.next();
        }
    }

    fn at_definition_start(&self) -> bool {
        let mut offset = 0;
        while self.stream.peek_nth(offset).payload.is_modifier() {
            offset += 1;
        }

        match self.stream.peek_nth(offset).payload {
            TokenKind::KwClass | TokenKind::KwTrait | TokenKind::KwObject => true,
            _ => false,
        }
    }

    /// Requires a statement boundary: `;`, a line break, or the end of the enclosing construct.
    fn expect_statement_end(&mut self, closing: TokenKind) -> ParseResult<()> {
        let token = self.stream.peek();
        if token.payload == TokenKind::Semicolon
            || token.payload == closing
            || token.payload == TokenKind::Eof
            || token.preceded_by_newline
        {
            Ok(())
        } else {
            Err(self.stream.unexpected("`;` or a new line"))
        }
    }

    fn parse_identifier(&mut self) -> ParseResult<ast::Identifier> {
        let token = self.stream.expect(TokenKind::Identifier, "identifier")?;
        Ok(ast::Identifier {
            text: token.lexeme,
            span: token.span,
        })
    }
}
