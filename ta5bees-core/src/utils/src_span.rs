use std::fmt::Display;

/// Byte range of a lexeme or node together with the line and column
/// (both 1-based) of its first character.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

/// A single point in the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SrcPos {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl SrcSpan {
	pub fn from(start: SrcPos, end: SrcPos) -> Self {
		Self { 
			start: start.offset, 
			end: end.offset,
			line: start.line,
			column: start.column
		}
	}

	pub fn at(pos: SrcPos) -> Self {
		Self::from(pos, pos)
	}

	/// Span covering `self` up to the end of `other`.
	pub fn join(self, other: SrcSpan) -> Self {
		Self { end: other.end.max(self.end), ..self }
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}
