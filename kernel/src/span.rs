use std::fmt;

/// A position in a source file. Lines and columns are 1-indexed, the
/// byte offset is 0-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Pos { line, column, offset }
    }
}

/// Source range attached to a term. The default span is empty and renders
/// as `<no location>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: Option<String>,
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub fn none() -> Self {
        Span::default()
    }

    pub fn new(file: impl Into<String>, start: Pos, end: Pos) -> Self {
        Span {
            file: Some(file.into()),
            start,
            end,
        }
    }

    /// Span without byte offsets, for hand-written test inputs.
    pub fn lines(file: &str, start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Span::new(
            file,
            Pos::new(start_line, start_col, 0),
            Pos::new(end_line, end_col, 0),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.start.line == 0 && self.start.column == 0 && self.end.line == 0 && self.end.column == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<no location>");
        }
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        write!(f, "{}:{}", self.start.line, self.start.column)?;
        if self.start.line != self.end.line {
            write!(f, "-{}:{}", self.end.line, self.end.column)
        } else if self.start.column != self.end.column {
            write!(f, "-{}", self.end.column)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_span_has_no_location() {
        assert_eq!(Span::none().to_string(), "<no location>");
    }

    #[test]
    fn single_line_range() {
        let span = Span::lines("a.htt", 3, 5, 3, 9);
        assert_eq!(span.to_string(), "a.htt:3:5-9");
    }

    #[test]
    fn multi_line_range() {
        let span = Span::lines("a.htt", 3, 5, 4, 2);
        assert_eq!(span.to_string(), "a.htt:3:5-4:2");
    }

    #[test]
    fn point_span_without_file() {
        let span = Span {
            file: None,
            start: Pos::new(7, 1, 40),
            end: Pos::new(7, 1, 40),
        };
        assert_eq!(span.to_string(), "7:1");
    }
}
