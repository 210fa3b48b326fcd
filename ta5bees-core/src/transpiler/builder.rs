use crate::utils::prelude::SrcSpan;

use super::source_map::{Mapping, Position};

const INDENT: &str = "  ";

/// Line-oriented output buffer with an indentation depth.
///
/// Every line pushed with an origin records a mapping from its generated
/// position to the source position of the node it came from.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    lines: Vec<String>,
    depth: usize,
    mappings: Vec<Mapping>
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose lines start `depth` levels deep.
    pub fn nested(depth: usize) -> Self {
        Self { depth, ..Self::default() }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn padding(depth: usize) -> String {
        INDENT.repeat(depth)
    }

    /// Appends `text` at the current depth. Only the first physical line is
    /// padded; continuation lines arrive already indented.
    pub fn line(&mut self, text: impl AsRef<str>, origin: Option<SrcSpan>) {
        let padding = Self::padding(self.depth);

        if let Some(span) = origin {
            self.mappings.push(Mapping {
                generated: Position {
                    line: self.lines.len() as u32 + 1,
                    column: padding.len() as u32
                },
                original: Position {
                    line: span.line,
                    column: span.column.saturating_sub(1)
                }
            });
        }

        let mut physical = text.as_ref().split('\n');

        if let Some(first) = physical.next() {
            self.lines.push(format!("{padding}{first}"));
        }

        self.lines.extend(physical.map(str::to_string));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Lines of this builder as one block, without a trailing newline.
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }

    pub fn finish(self) -> (String, Vec<Mapping>) {
        (self.code(), self.mappings)
    }
}
