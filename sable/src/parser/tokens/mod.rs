//! Definitions for tokens and tokenizers.
//!
//! A token is an "atomic" sequence of characters in the input that is treated by the parser as
//! indivisible. The tokenizer splits the whole source file into tokens up front, the parser
//! then works on the resulting vector.

pub mod primary;
pub mod token;
pub mod tokenizer;

use crate::source::{InputSpanFile, SourceText};
use lazy_static::lazy_static;
use primary::{PrimaryRules, PrimaryToken, TokenKind};
use tokenizer::Tokenizer;

lazy_static! {
    static ref PRIMARY_TOKENIZER: Tokenizer<TokenKind, PrimaryRules> = Tokenizer::new();
}

/// Splits the source code into tokens. The result always ends with a `TokenKind::Eof` token.
///
/// Unrecognized characters become `TokenKind::Error` tokens; it is up to the parser to report
/// them.
pub fn tokenize(source_code: &str, file: InputSpanFile) -> Vec<PrimaryToken> {
    let source = SourceText::new(source_code, file);
    let mut tokens = Vec::new();
    let mut offset = 0;

    while let Some((token, next_offset)) = PRIMARY_TOKENIZER.next(&source, offset) {
        tokens.push(token);
        offset = next_offset;
    }

    let trailing = PRIMARY_TOKENIZER.ignored_prefix(&source, offset);
    tokens.push(PrimaryToken::new(
        source.eof_span(),
        TokenKind::Eof,
        String::new(),
        trailing.contains('\n') || tokens.is_empty(),
    ));
    tokens
}

#[cfg(test)]
mod tests {
    use super::primary::TokenKind;
    use super::tokenize;
    use crate::source::InputSpanFile;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, InputSpanFile::UserProgram)
            .into_iter()
            .map(|token| token.payload)
            .collect()
    }

    #[test]
    fn class_header() {
        assert_eq!(
            kinds("abstract class A extends B with C"),
            vec![
                TokenKind::KwAbstract,
                TokenKind::KwClass,
                TokenKind::Identifier,
                TokenKind::KwExtends,
                TokenKind::Identifier,
                TokenKind::KwWith,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reserved_operators_are_distinguished() {
        assert_eq!(
            kinds("x: Int => y = z <: w :: v"),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Identifier,
                TokenKind::Subtype,
                TokenKind::Identifier,
                TokenKind::OperatorIdentifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds(r#"42 3.14 "str\"ing" 'c' true null"#),
            vec![
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::KwTrue,
                TokenKind::KwNull,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped_and_newlines_tracked() {
        let tokens = tokenize(
            "val a = 1 // trailing\n/* block\n comment */ val b",
            InputSpanFile::UserProgram,
        );

        let b = &tokens[5];
        assert_eq!(b.payload, TokenKind::Identifier);
        assert_eq!(b.lexeme, "b");
        assert_eq!(b.span.line, 3);
        assert!(tokens[4].preceded_by_newline);
        assert!(!b.preceded_by_newline);
    }

    #[test]
    fn unknown_characters_become_error_tokens() {
        let tokens = tokenize("val ` = 1", InputSpanFile::UserProgram);

        assert_eq!(tokens[1].payload, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "`");
        assert_eq!(tokens[2].payload, TokenKind::Equals);
    }

    #[test]
    fn identifier_prefixed_by_keyword() {
        assert_eq!(
            kinds("classy valid"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn unicode_identifiers() {
        let tokens = tokenize("val été = λ_+", InputSpanFile::UserProgram);

        assert_eq!(tokens[1].payload, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "été");
        assert_eq!(tokens[2].span.column, 9);
        assert_eq!(tokens[3].payload, TokenKind::Identifier);
        assert_eq!(tokens[3].lexeme, "λ_+");
    }
}
