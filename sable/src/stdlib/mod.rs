//! The prelude: declarations implicitly available to every program.
//!
//! The prelude is ordinary source code. It is parsed and analyzed together with the user
//! program, as the first compilation unit.

pub const PRELUDE_SOURCE: &str = include_str!("prelude.sbl");

#[cfg(test)]
mod tests {
    use super::PRELUDE_SOURCE;
    use crate::parser::{parse, tokenize};
    use crate::source::InputSpanFile;

    #[test]
    fn prelude_parses() {
        let program = parse(tokenize(PRELUDE_SOURCE, InputSpanFile::Prelude)).unwrap();
        let names: Vec<_> = program
            .definitions
            .iter()
            .map(|definition| definition.name.text.as_str())
            .collect();

        assert!(names.contains(&"Int"));
        assert!(names.contains(&"Product"));
        assert!(names.contains(&"Function2"));
    }
}
