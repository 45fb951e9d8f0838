//! Structural parser.
//!
//! Builds the entry tree from logical lines in a single forward pass with an
//! explicit stack of open containers. Parsing never fails: lines that do not
//! fit the grammar become [`EntryKind::RawBlock`] entries, and mismatched or
//! missing closers are reported as structural violations.

use crate::context::FileContext;
use crate::lexer::{lex_line, Keyword, PropertyKind, SourceLine, TokenKind};
use crate::syntax::{Entry, EntryKind, HelpBlock, LineRole, Property, SyntaxTree};
use crate::types::{Severity, Violation};
use std::ops::Range;
use tracing::debug;

/// Rule name of closers without a matching opener.
pub const UNMATCHED_CLOSER: &str = "unmatched-closer";
/// Rule code of closers without a matching opener.
pub const UNMATCHED_CLOSER_CODE: &str = "KL100";
/// Rule name of containers that are never closed.
pub const UNTERMINATED_BLOCK: &str = "unterminated-block";
/// Rule code of containers that are never closed.
pub const UNTERMINATED_BLOCK_CODE: &str = "KL101";

/// Parses logical lines into a syntax tree plus structural violations.
#[must_use]
pub fn parse(lines: Vec<SourceLine<'_>>) -> (SyntaxTree<'_>, Vec<Violation>) {
    let mut builder = Builder::new(lines.len());
    let mut index = 0;
    while index < lines.len() {
        index = builder.line(&lines, index);
    }
    builder.finish();

    let tree = SyntaxTree {
        lines,
        entries: builder.root,
        roles: builder.roles,
    };
    let ctx = FileContext::new(&tree);
    let violations = builder
        .issues
        .into_iter()
        .map(|issue| issue.into_violation(&ctx))
        .collect();
    (tree, violations)
}

/// Where the next property line attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    LastChild,
    Container,
}

#[derive(Debug)]
struct Issue {
    line: usize,
    rule: &'static str,
    code: &'static str,
    message: String,
    help: String,
}

impl Issue {
    fn into_violation(self, ctx: &FileContext<'_>) -> Violation {
        Violation::new(
            self.code,
            self.rule,
            Severity::Error,
            ctx.location(self.line),
            self.message,
        )
        .with_help(self.help)
    }
}

#[derive(Debug)]
struct Builder {
    root: Vec<Entry>,
    stack: Vec<Entry>,
    roles: Vec<LineRole>,
    target: Target,
    issues: Vec<Issue>,
}

impl Builder {
    fn new(line_count: usize) -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
            roles: vec![LineRole::Blank; line_count],
            target: Target::None,
            issues: Vec::new(),
        }
    }

    /// Handles the line at `index` and returns the index of the next
    /// unconsumed line.
    fn line(&mut self, lines: &[SourceLine<'_>], index: usize) -> usize {
        let line = &lines[index];
        if line.is_blank() {
            self.roles[index] = LineRole::Blank;
            return index + 1;
        }

        let tokens = lex_line(line);
        let name = tokens.get(1).map(|t| t.text(line).to_string());
        match tokens.first().map(|t| t.kind) {
            Some(TokenKind::Comment) => self.roles[index] = LineRole::Comment,
            Some(TokenKind::Keyword(keyword)) => {
                return self.keyword(lines, index, keyword, name);
            }
            _ => {
                if line.indent().is_empty() || !self.attach_property(index, PropertyKind::Unknown)
                {
                    self.raw(index);
                }
            }
        }
        index + 1
    }

    fn keyword(
        &mut self,
        lines: &[SourceLine<'_>],
        index: usize,
        keyword: Keyword,
        name: Option<String>,
    ) -> usize {
        let depth = self.stack.len();
        let leaf = |kind| {
            let entry = Entry::new(kind, index, depth);
            match &name {
                Some(name) => entry.with_name(name.clone()),
                None => entry,
            }
        };
        match keyword {
            Keyword::Config => self.header(index, leaf(EntryKind::Config), Target::LastChild),
            Keyword::MenuConfig => {
                self.header(index, leaf(EntryKind::MenuConfig), Target::LastChild);
            }
            Keyword::Comment => self.header(index, leaf(EntryKind::Comment), Target::LastChild),
            Keyword::Source => self.header(index, leaf(EntryKind::Source), Target::None),
            Keyword::MainMenu => self.header(index, leaf(EntryKind::MainMenu), Target::None),
            Keyword::Menu => self.open(index, leaf(EntryKind::Menu)),
            Keyword::Choice => self.open(index, leaf(EntryKind::Choice)),
            Keyword::If => self.open(index, leaf(EntryKind::If)),
            Keyword::EndMenu => self.closer(index, EntryKind::Menu),
            Keyword::EndChoice => self.closer(index, EntryKind::Choice),
            Keyword::EndIf => self.closer(index, EntryKind::If),
            Keyword::Help => return self.help(lines, index),
            Keyword::Property(kind) => {
                if !self.attach_property(index, kind) {
                    self.raw(index);
                }
            }
        }
        index + 1
    }

    fn children(&mut self) -> &mut Vec<Entry> {
        match self.stack.last_mut() {
            Some(container) => &mut container.children,
            None => &mut self.root,
        }
    }

    fn target_entry(&mut self) -> Option<&mut Entry> {
        match self.target {
            Target::None => None,
            Target::LastChild => self.children().last_mut(),
            Target::Container => self.stack.last_mut(),
        }
    }

    fn add_child(&mut self, entry: Entry, target: Target) {
        self.children().push(entry);
        self.target = target;
    }

    fn header(&mut self, index: usize, entry: Entry, target: Target) {
        self.roles[index] = LineRole::Header;
        self.add_child(entry, target);
    }

    fn open(&mut self, index: usize, entry: Entry) {
        self.roles[index] = LineRole::Header;
        self.target = if entry.kind == EntryKind::If {
            Target::None
        } else {
            Target::Container
        };
        self.stack.push(entry);
    }

    fn attach_property(&mut self, index: usize, kind: PropertyKind) -> bool {
        let Some(entry) = self.target_entry() else {
            return false;
        };
        entry.properties.push(Property { line: index, kind });
        entry.end = entry.end.max(index);
        self.roles[index] = LineRole::Property;
        true
    }

    fn raw(&mut self, index: usize) {
        self.roles[index] = LineRole::Raw;
        let mergeable = self.children().last().and_then(|last| {
            (last.kind == EntryKind::RawBlock && last.end + 1 == index).then_some(last.end)
        });
        match mergeable {
            Some(end) if self.roles[end] == LineRole::Raw => {
                if let Some(last) = self.children().last_mut() {
                    last.end = index;
                }
                self.target = Target::None;
            }
            _ => {
                let entry = Entry::new(EntryKind::RawBlock, index, self.stack.len());
                self.add_child(entry, Target::None);
            }
        }
    }

    fn help(&mut self, lines: &[SourceLine<'_>], index: usize) -> usize {
        let body = capture_help(lines, index);
        self.roles[index] = LineRole::HelpKeyword;
        for i in body.clone() {
            self.roles[i] = if lines[i].is_blank() {
                LineRole::Blank
            } else {
                LineRole::HelpText
            };
        }

        let block = HelpBlock {
            keyword_line: index,
            lines: body.clone(),
        };
        let last = block.last_line();
        let attached = match self.target_entry() {
            Some(entry) if entry.help.is_none() => {
                entry.help = Some(block.clone());
                entry.end = entry.end.max(last);
                true
            }
            _ => false,
        };
        if !attached {
            debug!("Free-standing help block at line {}", lines[index].number);
            let mut entry = Entry::new(EntryKind::HelpBlock, index, self.stack.len());
            entry.end = last;
            entry.help = Some(block);
            self.add_child(entry, Target::None);
        }
        body.end.max(index + 1)
    }

    fn closer(&mut self, index: usize, kind: EntryKind) {
        let closer = kind.closer().unwrap_or_default();
        let Some(position) = self.stack.iter().rposition(|e| e.kind == kind) else {
            self.issues.push(Issue {
                line: index,
                rule: UNMATCHED_CLOSER,
                code: UNMATCHED_CLOSER_CODE,
                message: format!("`{closer}` without matching `{}`", kind.keyword()),
                help: format!("Remove this `{closer}` or add the missing `{}`", kind.keyword()),
            });
            self.roles[index] = LineRole::StrayCloser;
            let entry = Entry::new(EntryKind::RawBlock, index, self.stack.len());
            self.add_child(entry, Target::None);
            return;
        };

        while self.stack.len() > position + 1 {
            self.close_unterminated();
        }
        self.roles[index] = LineRole::Closer;
        self.close(Some(index));
    }

    fn close_unterminated(&mut self) {
        if let Some(open) = self.stack.last() {
            let kind = open.kind;
            let closer = kind.closer().unwrap_or_default();
            self.issues.push(Issue {
                line: open.start,
                rule: UNTERMINATED_BLOCK,
                code: UNTERMINATED_BLOCK_CODE,
                message: format!("`{}` block is never closed", kind.keyword()),
                help: format!("Add a matching `{closer}`"),
            });
        }
        self.close(None);
    }

    fn close(&mut self, closer: Option<usize>) {
        let Some(mut entry) = self.stack.pop() else {
            return;
        };
        entry.closer = closer;
        entry.end = match closer {
            Some(index) => index,
            None => entry
                .children
                .last()
                .map_or(entry.end, |child| child.end.max(entry.end)),
        };
        self.add_child(entry, Target::None);
    }

    fn finish(&mut self) {
        while !self.stack.is_empty() {
            self.close_unterminated();
        }
    }
}

/// True if the line starts with a Kconfig keyword or is a `#` comment.
fn starts_structure(line: &SourceLine<'_>) -> bool {
    let content = line.content();
    if content.starts_with('#') {
        return true;
    }
    let word = content.split_whitespace().next().unwrap_or_default();
    Keyword::from_word(word).is_some()
}

/// Finds the body of the help block whose keyword is at `keyword`.
///
/// Lines indented deeper than the keyword are help text. If the first text
/// line is not deeper but is not a keyword either, the body continues over
/// lines at least as deep as that first line that are not keywords. Blank
/// lines belong to the body only when more text follows.
fn capture_help(lines: &[SourceLine<'_>], keyword: usize) -> Range<usize> {
    let keyword_width = lines[keyword].indent_width();
    let mut relaxed: Option<usize> = None;
    let mut seen_text = false;
    let mut end = keyword + 1;

    for (index, line) in lines.iter().enumerate().skip(keyword + 1) {
        if line.is_blank() {
            continue;
        }
        let width = line.indent_width();
        let is_text = if width > keyword_width {
            true
        } else if !seen_text {
            let text = !starts_structure(line);
            if text {
                relaxed = Some(width);
            }
            text
        } else {
            relaxed.is_some_and(|min| width >= min && !starts_structure(line))
        };
        if !is_text {
            break;
        }
        seen_text = true;
        end = index + 1;
    }

    keyword + 1..end
}
