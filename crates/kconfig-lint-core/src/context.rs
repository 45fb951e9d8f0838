//! Context types for rule execution.

use crate::lexer::SourceLine;
use crate::syntax::{LineRole, SyntaxTree};
use crate::types::Location;

/// Context provided to rules for one parsed file.
///
/// Gives access to the syntax tree and translates line indices and byte
/// offsets into reportable locations.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Parsed file.
    pub tree: &'a SyntaxTree<'a>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree<'a>) -> Self {
        Self { tree }
    }

    /// Logical lines of the file.
    #[must_use]
    pub fn lines(&self) -> &'a [SourceLine<'a>] {
        &self.tree.lines
    }

    /// Logical line at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; rules only receive indices from the
    /// tree they are checking.
    #[must_use]
    pub fn line(&self, index: usize) -> &'a SourceLine<'a> {
        &self.tree.lines[index]
    }

    /// Role of the logical line at `index`.
    #[must_use]
    pub fn role(&self, index: usize) -> LineRole {
        self.tree.role(index)
    }

    /// Location of the content of the logical line at `index`.
    #[must_use]
    pub fn location(&self, index: usize) -> Location {
        let line = self.line(index);
        let content = line.content_range();
        Location::new(line.number, line.indent().chars().count() + 1)
            .with_end_line(line.last_number)
            .with_span(content.start, content.end - content.start)
    }

    /// Location of `length` bytes at absolute `offset` inside the logical line
    /// at `index`. Line and column refer to the physical line holding `offset`.
    #[must_use]
    pub fn location_at(&self, index: usize, offset: usize, length: usize) -> Location {
        let line = self.line(index);
        let physical = line
            .physical_lines()
            .take_while(|p| p.start <= offset)
            .last();
        let (number, column) = physical.map_or((line.number, 1), |p| {
            let within = offset.saturating_sub(p.start).min(p.text.len());
            let column = p
                .text
                .get(..within)
                .map_or(within, |prefix| prefix.chars().count());
            (p.number, column + 1)
        });
        Location::new(number, column).with_span(offset, length)
    }
}
