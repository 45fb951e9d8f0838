//! Position-preserving syntax tree.
//!
//! The tree never owns text. Entries refer to logical lines by index into
//! [`SyntaxTree::lines`], which remain the backing store for every byte of
//! the original buffer.

use crate::lexer::{PropertyKind, SourceLine};
use std::ops::Range;

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// `config NAME`
    Config,
    /// `menuconfig NAME`
    MenuConfig,
    /// `choice [NAME]` ... `endchoice`
    Choice,
    /// `menu "prompt"` ... `endmenu`
    Menu,
    /// `if EXPR` ... `endif`
    If,
    /// `source "path"` and its relatives.
    Source,
    /// `comment "text"`
    Comment,
    /// `mainmenu "title"`
    MainMenu,
    /// A `help` block with no entry to attach to.
    HelpBlock,
    /// Lines the parser did not recognize, kept verbatim.
    RawBlock,
}

impl EntryKind {
    /// True for kinds that own children and require a closer.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Choice | Self::Menu | Self::If)
    }

    /// Keyword that closes this container.
    #[must_use]
    pub fn closer(self) -> Option<&'static str> {
        match self {
            Self::Choice => Some("endchoice"),
            Self::Menu => Some("endmenu"),
            Self::If => Some("endif"),
            _ => None,
        }
    }

    /// Keyword that opens this kind of entry.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::MenuConfig => "menuconfig",
            Self::Choice => "choice",
            Self::Menu => "menu",
            Self::If => "if",
            Self::Source => "source",
            Self::Comment => "comment",
            Self::MainMenu => "mainmenu",
            Self::HelpBlock => "help",
            Self::RawBlock => "raw",
        }
    }

    /// True for kinds whose identifier is a configuration symbol.
    #[must_use]
    pub fn is_symbol(self) -> bool {
        matches!(self, Self::Config | Self::MenuConfig | Self::Choice)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Role the parser assigned to a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Empty or whitespace-only line outside help text.
    Blank,
    /// Full-line `#` comment.
    Comment,
    /// First line of an entry (`config`, `menu`, `source`, ...).
    Header,
    /// Property line attached to an entry.
    Property,
    /// The `help` keyword line.
    HelpKeyword,
    /// Body line of a help block (blank lines inside keep [`LineRole::Blank`]).
    HelpText,
    /// `endmenu`, `endchoice` or `endif` closing an open container.
    Closer,
    /// Closer without a matching opener.
    StrayCloser,
    /// Unrecognized line.
    Raw,
}

/// A property line of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    /// Logical line index.
    pub line: usize,
    /// Property kind.
    pub kind: PropertyKind,
}

/// A help block: keyword line plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpBlock {
    /// Logical line index of the `help` keyword.
    pub keyword_line: usize,
    /// Logical line indices of the body. Trailing blank lines are excluded.
    pub lines: Range<usize>,
}

impl HelpBlock {
    /// Last logical line index covered by the block.
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.lines.end.max(self.keyword_line + 1) - 1
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Node kind.
    pub kind: EntryKind,
    /// Logical line index of the header (first line).
    pub start: usize,
    /// Logical line index of the last line (closer for containers).
    pub end: usize,
    /// Number of enclosing containers.
    pub depth: usize,
    /// Text following the keyword: symbol name, prompt or source path.
    pub name: Option<String>,
    /// Attached property lines, in source order.
    pub properties: Vec<Property>,
    /// Attached help block.
    pub help: Option<HelpBlock>,
    /// Children of a container, in source order.
    pub children: Vec<Entry>,
    /// Logical line index of the closer, if one was present.
    pub closer: Option<usize>,
}

impl Entry {
    /// Creates an entry spanning a single line.
    #[must_use]
    pub fn new(kind: EntryKind, line: usize, depth: usize) -> Self {
        Self {
            kind,
            start: line,
            end: line,
            depth,
            name: None,
            properties: Vec::new(),
            help: None,
            children: Vec::new(),
            closer: None,
        }
    }

    /// Sets the entry name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Logical line indices covered by this entry.
    #[must_use]
    pub fn lines(&self) -> Range<usize> {
        self.start..self.end + 1
    }

    /// Last line of the header region: header, properties and help, but not
    /// children or closer.
    #[must_use]
    pub fn header_end(&self) -> usize {
        let props = self.properties.iter().map(|p| p.line).max();
        let help = self.help.as_ref().map(HelpBlock::last_line);
        props.into_iter().chain(help).fold(self.start, usize::max)
    }

    /// True for [`EntryKind::is_container`] kinds.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}

/// Parsed file: logical lines, the entry forest and per-line roles.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'a> {
    /// Logical lines, the backing store of the buffer.
    pub lines: Vec<SourceLine<'a>>,
    /// Top-level entries.
    pub entries: Vec<Entry>,
    /// Role of each logical line, indexed like `lines`.
    pub roles: Vec<LineRole>,
}

impl<'a> SyntaxTree<'a> {
    /// Returns the logical line at `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&SourceLine<'a>> {
        self.lines.get(index)
    }

    /// Returns the role of the logical line at `index`.
    #[must_use]
    pub fn role(&self, index: usize) -> LineRole {
        self.roles.get(index).copied().unwrap_or(LineRole::Raw)
    }

    /// Iterates over every entry in document order (parents before children).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.entries.iter().rev().collect(),
        }
    }

    /// Iterates over every sibling list: the top level, then the children of
    /// each container in document order.
    pub fn sibling_lists(&self) -> impl Iterator<Item = (Option<&Entry>, &[Entry])> {
        std::iter::once((None, self.entries.as_slice())).chain(
            self.walk()
                .filter(|e| e.is_container())
                .map(|e| (Some(e), e.children.as_slice())),
        )
    }

    /// Reassembles the buffer from its lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .flat_map(|l| [l.text, l.ending.as_str()])
            .collect()
    }
}

/// Preorder iterator over a [`SyntaxTree`].
#[derive(Debug)]
pub struct Walk<'t> {
    stack: Vec<&'t Entry>,
}

impl<'t> Iterator for Walk<'t> {
    type Item = &'t Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev());
        Some(entry)
    }
}
