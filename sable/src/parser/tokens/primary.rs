//! Primary tokenizer definitions: token kinds of the language and the rules producing them.

use crate::parser::tokens::token::{Token, TokenPayload};
use crate::parser::tokens::tokenizer::{Handler, TokenizerRules};
use regex::Regex;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    KwAbstract,
    KwCase,
    KwClass,
    KwDef,
    KwElse,
    KwExtends,
    KwFalse,
    KwFinal,
    KwIf,
    KwImplicit,
    KwLazy,
    KwNew,
    KwNull,
    KwObject,
    KwOverride,
    KwPrivate,
    KwProtected,
    KwSealed,
    KwThis,
    KwTrait,
    KwTrue,
    KwVal,
    KwVar,
    KwWhile,
    KwWith,
    Identifier,

    /// A run of operator characters that is not one of the reserved spellings below.
    OperatorIdentifier,

    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Equals,
    Arrow,
    Subtype,
    Underscore,
    Hash,
    At,
    Error,
    Eof,
}

pub type PrimaryToken = Token<TokenKind>;

impl TokenPayload for TokenKind {
    fn error() -> Self {
        TokenKind::Error
    }
}

const KEYWORDS: [(&str, TokenKind); 25] = [
    ("abstract", TokenKind::KwAbstract),
    ("case", TokenKind::KwCase),
    ("class", TokenKind::KwClass),
    ("def", TokenKind::KwDef),
    ("else", TokenKind::KwElse),
    ("extends", TokenKind::KwExtends),
    ("false", TokenKind::KwFalse),
    ("final", TokenKind::KwFinal),
    ("if", TokenKind::KwIf),
    ("implicit", TokenKind::KwImplicit),
    ("lazy", TokenKind::KwLazy),
    ("new", TokenKind::KwNew),
    ("null", TokenKind::KwNull),
    ("object", TokenKind::KwObject),
    ("override", TokenKind::KwOverride),
    ("private", TokenKind::KwPrivate),
    ("protected", TokenKind::KwProtected),
    ("sealed", TokenKind::KwSealed),
    ("this", TokenKind::KwThis),
    ("trait", TokenKind::KwTrait),
    ("true", TokenKind::KwTrue),
    ("val", TokenKind::KwVal),
    ("var", TokenKind::KwVar),
    ("while", TokenKind::KwWhile),
    ("with", TokenKind::KwWith),
];

fn classify_word(text: &str) -> TokenKind {
    if text == "_" {
        return TokenKind::Underscore;
    }

    KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == text)
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Identifier)
}

fn classify_operator(text: &str) -> TokenKind {
    match text {
        ":" => TokenKind::Colon,
        "=" => TokenKind::Equals,
        "=>" => TokenKind::Arrow,
        "<:" => TokenKind::Subtype,
        "#" => TokenKind::Hash,
        "@" => TokenKind::At,
        _ => TokenKind::OperatorIdentifier,
    }
}

impl TokenKind {
    /// Whether the token is one of the declaration modifier keywords.
    pub fn is_modifier(self) -> bool {
        match self {
            TokenKind::KwAbstract
            | TokenKind::KwCase
            | TokenKind::KwFinal
            | TokenKind::KwImplicit
            | TokenKind::KwLazy
            | TokenKind::KwOverride
            | TokenKind::KwPrivate
            | TokenKind::KwProtected
            | TokenKind::KwSealed => true,
            _ => false,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some((keyword, _)) = KEYWORDS.iter().find(|(_, kind)| kind == self) {
            return write!(f, "`{}`", keyword);
        }

        let text = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::OperatorIdentifier => "operator",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "floating point literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Colon => "`:`",
            TokenKind::Equals => "`=`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Subtype => "`<:`",
            TokenKind::Underscore => "`_`",
            TokenKind::Hash => "`#`",
            TokenKind::At => "`@`",
            TokenKind::Error => "unrecognized input",
            TokenKind::Eof => "end of file",
            _ => unreachable!("keywords are handled above"),
        };
        write!(f, "{}", text)
    }
}

pub struct PrimaryRules;

fn rule(pattern: &str, handler: Handler<TokenKind>) -> (Regex, Handler<TokenKind>) {
    (Regex::new(pattern).unwrap(), handler)
}

impl TokenizerRules<TokenKind> for PrimaryRules {
    fn rules() -> Vec<(Regex, Handler<TokenKind>)> {
        vec![
            rule(r"^[\p{XID_Start}_$][\p{XID_Continue}$]*", Box::new(classify_word)),
            rule(
                r"^[\p{XID_Start}_$][\p{XID_Continue}$]*_[+\-*/%<>=!&|^~:?#@\\]+",
                Box::new(|_| TokenKind::Identifier),
            ),
            rule(r"^[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", Box::new(|_| TokenKind::FloatLiteral)),
            rule(r"^[0-9]+[lL]?", Box::new(|_| TokenKind::IntLiteral)),
            rule(r#"^"([^"\\\n]|\\.)*""#, Box::new(|_| TokenKind::StringLiteral)),
            rule(r"^'([^'\\\n]|\\.)'", Box::new(|_| TokenKind::CharLiteral)),
            rule(r"^[+\-*/%<>=!&|^~:?#@\\]+", Box::new(classify_operator)),
            rule(r"^\(", Box::new(|_| TokenKind::LeftParen)),
            rule(r"^\)", Box::new(|_| TokenKind::RightParen)),
            rule(r"^\[", Box::new(|_| TokenKind::LeftBracket)),
            rule(r"^\]", Box::new(|_| TokenKind::RightBracket)),
            rule(r"^\{", Box::new(|_| TokenKind::LeftBrace)),
            rule(r"^\}", Box::new(|_| TokenKind::RightBrace)),
            rule(r"^,", Box::new(|_| TokenKind::Comma)),
            rule(r"^;", Box::new(|_| TokenKind::Semicolon)),
            rule(r"^\.", Box::new(|_| TokenKind::Dot)),
        ]
    }

    fn ignored_rule() -> Option<Regex> {
        Some(Regex::new(r"^(\s|//[^\n]*|/\*(?s:.)*?\*/)+").unwrap())
    }
}
