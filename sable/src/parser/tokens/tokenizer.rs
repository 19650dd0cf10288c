//! Definitions related to tokenizers.

use crate::parser::tokens::token::{Token, TokenPayload};
use crate::source::SourceText;
use lazy_static::lazy_static;
use regex::Regex;
use std::marker::PhantomData;

pub type Handler<T> = Box<dyn Sync + Send + Fn(&str) -> T>;

pub trait TokenizerRules<Payload: TokenPayload> {
    fn rules() -> Vec<(Regex, Handler<Payload>)>;
    fn ignored_rule() -> Option<Regex>;
}

/// Regex-based tokenizer.
///
/// Tokenizers are defined by a list of rules represented by `Rules`: `Rules::rules()` should
/// contain rules for tokens, ordered by precedence. The tokenizer will try all rules, and choose
/// the one that produces the longest match. In case of conflict, the first such rule is chosen.
/// All rule regexes must be anchored to the start of input (`^`).
pub struct Tokenizer<Payload: TokenPayload, Rules: TokenizerRules<Payload>> {
    rules: Vec<(Regex, Handler<Payload>)>,
    ignored_rule: Option<Regex>,
    phantom: PhantomData<Rules>,
}

lazy_static! {
    static ref FALLBACK_RE: Regex = Regex::new(r"^\S").unwrap();
}

impl<Payload: TokenPayload, Rules: TokenizerRules<Payload>> Tokenizer<Payload, Rules> {
    pub fn new() -> Self {
        let mut tokenizer = Tokenizer {
            rules: Rules::rules(),
            ignored_rule: Rules::ignored_rule(),
            phantom: PhantomData,
        };
        // `max_by_key` returns the last match if keys are equal, which causes the tokenizer to
        // prefer rules later in the list. To keep the interface as "first longest match", we
        // reverse the rule list internally.
        tokenizer.rules.reverse();
        tokenizer
    }

    /// Produces the token starting at `offset` (after skipping ignored input), together with
    /// the offset right after it. Returns `None` at the end of input.
    pub fn next(&self, source: &SourceText, offset: usize) -> Option<(Token<Payload>, usize)> {
        let ignored = self.ignored_prefix(source, offset);
        let preceded_by_newline = offset == 0 || ignored.contains('\n');
        let start = offset + ignored.len();
        let rest = &source.text[start..];

        if rest.is_empty() {
            return None;
        }

        let best = self
            .rules
            .iter()
            .filter_map(|(re, handler)| re.find(rest).map(|match_| (match_.end(), handler)))
            .filter(|(length, _)| *length > 0)
            .max_by_key(|(length, _)| *length);

        let (length, payload) = match best {
            Some((length, handler)) => (length, handler(&rest[..length])),
            // Produce an error token.
            None => match FALLBACK_RE.find(rest) {
                Some(match_) => (match_.end(), Payload::error()),
                None => return None,
            },
        };

        let end = start + length;
        let token = Token::new(
            source.span(start, end),
            payload,
            source.text[start..end].to_string(),
            preceded_by_newline,
        );
        Some((token, end))
    }

    /// Returns the ignored text (whitespace, comments) that starts at `offset`.
    pub fn ignored_prefix<'s>(&self, source: &SourceText<'s>, offset: usize) -> &'s str {
        let text: &'s str = source.text;
        let rest = &text[offset..];
        let length = self
            .ignored_rule
            .as_ref()
            .and_then(|ignored_rule| ignored_rule.find(rest))
            .map(|match_| match_.end())
            .unwrap_or(0);
        &rest[..length]
    }
}
