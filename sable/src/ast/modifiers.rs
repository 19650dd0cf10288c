//! Declaration modifiers.

use crate::source::InputSpan;
use bitflags::bitflags;

bitflags! {
    /// A closed set of modifiers that can be attached to declarations.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const ABSTRACT = 1 << 0;
        const FINAL = 1 << 1;
        const SEALED = 1 << 2;
        const CASE = 1 << 3;
        const OVERRIDE = 1 << 4;
        const PRIVATE = 1 << 5;
        const PROTECTED = 1 << 6;
        const IMPLICIT = 1 << 7;
        const LAZY = 1 << 8;
    }
}

const KEYWORDS: [(Modifiers, &str); 9] = [
    (Modifiers::PRIVATE, "private"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::OVERRIDE, "override"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::FINAL, "final"),
    (Modifiers::SEALED, "sealed"),
    (Modifiers::IMPLICIT, "implicit"),
    (Modifiers::LAZY, "lazy"),
    (Modifiers::CASE, "case"),
];

impl Modifiers {
    /// Source spelling of a single modifier flag.
    pub fn keyword(self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, keyword)| *keyword)
    }

    /// Source spellings of all contained modifiers, in canonical order.
    pub fn keywords(self) -> Vec<&'static str> {
        KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| *keyword)
            .collect()
    }

    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        KEYWORDS
            .iter()
            .find(|(_, text)| *text == keyword)
            .map(|(flag, _)| *flag)
    }
}

/// Modifiers as written in the source, remembering where each of them appeared.
#[derive(Debug, Clone, Default)]
pub struct ModifierList {
    pub flags: Modifiers,
    pub spans: Vec<(Modifiers, InputSpan)>,
}

impl ModifierList {
    pub fn new() -> ModifierList {
        ModifierList::default()
    }

    pub fn add(&mut self, modifier: Modifiers, span: InputSpan) {
        self.flags |= modifier;
        self.spans.push((modifier, span));
    }

    pub fn contains(&self, modifier: Modifiers) -> bool {
        self.flags.contains(modifier)
    }

    pub fn span_of(&self, modifier: Modifiers) -> Option<InputSpan> {
        self.spans
            .iter()
            .find(|(flag, _)| *flag == modifier)
            .map(|(_, span)| *span)
    }
}

#[cfg(test)]
mod tests {
    use super::Modifiers;

    #[test]
    fn keywords_are_canonically_ordered() {
        let modifiers = Modifiers::CASE | Modifiers::ABSTRACT | Modifiers::SEALED;
        assert_eq!(modifiers.keywords(), vec!["abstract", "sealed", "case"]);
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(Modifiers::from_keyword("lazy"), Some(Modifiers::LAZY));
        assert_eq!(Modifiers::from_keyword("class"), None);
        assert_eq!(Modifiers::FINAL.keyword(), Some("final"));
    }
}
