//! Source text and locations in it.

/// A contiguous region of one of the compiled source files.
///
/// Every token and syntax node carries a span. Spans are only ever used for reporting:
/// no analysis decision depends on where something was written.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct InputSpan {
    pub file: InputSpanFile,
    pub start: usize,
    pub end: usize,

    /// 1-based line of `start`.
    pub line: u32,

    /// 1-based column of `start`, counted in characters.
    pub column: u32,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum InputSpanFile {
    UserProgram,
    Prelude,
}

/// Line/column/offset triple identifying a single point in a source file.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl InputSpan {
    /// Returns a span for the first character of the file.
    /// Can be useful as a placeholder, when the caller is sure that the span is not going
    /// to be displayed to the end user.
    pub fn top_of_file() -> InputSpan {
        InputSpan {
            file: InputSpanFile::UserProgram,
            start: 0,
            end: 1,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.start,
        }
    }

    /// Smallest span covering both `self` and `other`. Both spans must be in the same file.
    pub fn to(&self, other: InputSpan) -> InputSpan {
        if other.start < self.start {
            return other.to(*self);
        }

        InputSpan {
            end: self.end.max(other.end),
            ..*self
        }
    }

    /// Zero-width span located right after `self`. `text` must be the single-line text that
    /// `self` covers.
    pub fn after(&self, text: &str) -> InputSpan {
        InputSpan {
            start: self.end,
            end: self.end,
            column: self.column + text.chars().count() as u32,
            ..*self
        }
    }
}

/// Source code of a single file together with an index of line starts.
pub struct SourceText<'a> {
    pub text: &'a str,
    pub file: InputSpanFile,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str, file: InputSpanFile) -> SourceText<'a> {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();

        SourceText {
            text,
            file,
            line_starts,
        }
    }

    /// Builds a span for the byte range `start..end`.
    pub fn span(&self, start: usize, end: usize) -> InputSpan {
        let line_index = match self.line_starts.binary_search(&start) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self.text[line_start..start].chars().count() + 1;

        InputSpan {
            file: self.file,
            start,
            end,
            line: line_index as u32 + 1,
            column: column as u32,
        }
    }

    /// Zero-width span at the very end of the text.
    pub fn eof_span(&self) -> InputSpan {
        self.span(self.text.len(), self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{InputSpanFile, SourceText};

    #[test]
    fn computes_line_and_column() {
        let source = SourceText::new("class A\n  val x = 1\n", InputSpanFile::UserProgram);

        let span = source.span(12, 13);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 5);
        assert_eq!(span.position().offset, 12);
    }

    #[test]
    fn first_character_of_line() {
        let source = SourceText::new("a\nb\nc", InputSpanFile::UserProgram);

        let span = source.span(4, 5);
        assert_eq!((span.line, span.column), (3, 1));
    }

    #[test]
    fn joins_spans() {
        let source = SourceText::new("trait T { def f: Int }", InputSpanFile::UserProgram);
        let left = source.span(0, 5);
        let right = source.span(10, 13);

        let joined = right.to(left);
        assert_eq!((joined.start, joined.end), (0, 13));
        assert_eq!(joined.column, 1);
    }

    #[test]
    fn columns_count_characters() {
        let text = "val été = 1";
        let source = SourceText::new(text, InputSpanFile::UserProgram);

        let name = source.span(4, 9);
        assert_eq!(name.column, 5);

        let end = name.after(&text[4..9]);
        assert_eq!((end.start, end.column), (9, 8));
        assert_eq!(end, source.span(9, 9));
    }
}
