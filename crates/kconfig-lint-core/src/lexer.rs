//! Tokenizer for Kconfig source text.
//!
//! Splits a buffer into logical lines (backslash continuations merged) and
//! classifies the tokens of a single logical line. Every line keeps its raw
//! text, its original line ending and its byte offset so that edits can be
//! spliced back into the buffer without touching anything else.

use std::ops::Range;

/// Columns a tab advances to when measuring indentation.
pub const TAB_WIDTH: usize = 8;

/// Line terminator of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// Last line of a buffer without a terminator.
    None,
}

impl LineEnding {
    /// Returns the terminator text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }

    /// Returns the terminator length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        self.as_str().len()
    }

    /// Returns true for [`LineEnding::None`].
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::None
    }
}

/// A logical line of the source buffer.
///
/// `text` excludes the final line ending but includes any inner
/// `\`-newline continuation sequences verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Line number (1-indexed) of the first physical line.
    pub number: usize,
    /// Line number (1-indexed) of the last physical line.
    pub last_number: usize,
    /// Raw text without the final line ending.
    pub text: &'a str,
    /// Original line ending.
    pub ending: LineEnding,
    /// Byte offset of `text` in the source buffer.
    pub start: usize,
}

impl<'a> SourceLine<'a> {
    /// Byte offset just past `text`.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Byte offset just past the line ending.
    #[must_use]
    pub fn full_end(&self) -> usize {
        self.end() + self.ending.len()
    }

    /// Byte range of `text` in the source buffer.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// True if the line has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if the line contains only spaces and tabs.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(is_indent_char)
    }

    /// True if the line was merged from several physical lines.
    #[must_use]
    pub fn is_continued(&self) -> bool {
        self.last_number > self.number
    }

    /// Leading spaces and tabs of the first physical line.
    #[must_use]
    pub fn indent(&self) -> &'a str {
        let len = self.text.len() - self.text.trim_start_matches(is_indent_char).len();
        &self.text[..len]
    }

    /// Visual width of the indentation.
    #[must_use]
    pub fn indent_width(&self) -> usize {
        visual_width(self.indent())
    }

    /// Text between the indentation and any trailing whitespace.
    #[must_use]
    pub fn content(&self) -> &'a str {
        let range = self.content_range();
        &self.text[range.start - self.start..range.end - self.start]
    }

    /// Absolute byte range of [`SourceLine::content`].
    #[must_use]
    pub fn content_range(&self) -> Range<usize> {
        let begin = self.indent().len();
        let end = self.text.trim_end_matches(is_indent_char).len().max(begin);
        self.start + begin..self.start + end
    }

    /// Absolute byte range of the indentation.
    #[must_use]
    pub fn indent_range(&self) -> Range<usize> {
        self.start..self.start + self.indent().len()
    }

    /// Iterates over the physical lines making up this logical line.
    pub fn physical_lines(&self) -> impl Iterator<Item = PhysicalLine<'a>> + '_ {
        let mut offset = self.start;
        let text = self.text;
        text.split('\n').enumerate().map(move |(i, segment)| {
            let start = offset;
            offset += segment.len() + 1;
            let segment = if start + segment.len() < self.end() {
                segment.strip_suffix('\r').unwrap_or(segment)
            } else {
                segment
            };
            PhysicalLine {
                number: self.number + i,
                text: segment,
                start,
            }
        })
    }
}

/// One physical line inside a [`SourceLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine<'a> {
    /// Line number (1-indexed).
    pub number: usize,
    /// Text without its line ending.
    pub text: &'a str,
    /// Byte offset in the source buffer.
    pub start: usize,
}

/// Returns true for the characters Kconfig treats as indentation.
#[must_use]
pub fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Visual width of leading whitespace, with tabs advancing to the next stop.
#[must_use]
pub fn visual_width(indent: &str) -> usize {
    indent.chars().fold(0, |col, c| {
        if c == '\t' {
            (col / TAB_WIDTH + 1) * TAB_WIDTH
        } else {
            col + 1
        }
    })
}

/// Splits `text` into logical lines.
///
/// Physical lines whose text ends in an odd number of backslashes are merged
/// with the following line. The merged text keeps the backslash and the inner
/// line ending so the buffer can be reproduced byte for byte.
#[must_use]
pub fn tokenize(text: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, usize)> = None;
    let mut offset = 0;
    let mut number = 0;

    while offset < text.len() {
        number += 1;
        let rest = &text[offset..];
        let (len, ending) = match rest.find('\n') {
            Some(i) if i > 0 && rest.as_bytes()[i - 1] == b'\r' => (i - 1, LineEnding::CrLf),
            Some(i) => (i, LineEnding::Lf),
            None => (rest.len(), LineEnding::None),
        };
        let physical = &rest[..len];
        let (start, first) = pending.take().unwrap_or((offset, number));

        if ending != LineEnding::None && ends_with_continuation(physical) {
            pending = Some((start, first));
        } else {
            lines.push(SourceLine {
                number: first,
                last_number: number,
                text: &text[start..offset + len],
                ending,
                start,
            });
        }
        offset += len + ending.len();
    }

    // A continuation on the very last line has nothing to join with.
    if let Some((start, first)) = pending {
        let ending = if text.ends_with("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        lines.push(SourceLine {
            number: first,
            last_number: number,
            text: &text[start..text.len() - ending.len()],
            ending,
            start,
        });
    }

    lines
}

fn ends_with_continuation(physical: &str) -> bool {
    let backslashes = physical.len() - physical.trim_end_matches('\\').len();
    backslashes % 2 == 1
}

/// Kind of a Kconfig property line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    /// `bool`, `tristate`, `string`, `hex`, `int`
    Type,
    /// `def_bool`, `def_tristate`, ...
    DefType,
    /// `prompt`
    Prompt,
    /// `default`
    Default,
    /// `depends on`
    DependsOn,
    /// `select`
    Select,
    /// `imply`
    Imply,
    /// `range`
    Range,
    /// `visible if`
    VisibleIf,
    /// `option`
    Option,
    /// `modules`
    Modules,
    /// `transitional`
    Transitional,
    /// `optional` (choice)
    Optional,
    /// Indented line with an unrecognized keyword inside an entry.
    Unknown,
}

impl PropertyKind {
    /// All kinds that can be named in configuration.
    pub const ALL: [Self; 14] = [
        Self::Type,
        Self::DefType,
        Self::Prompt,
        Self::Default,
        Self::DependsOn,
        Self::Select,
        Self::Imply,
        Self::Range,
        Self::VisibleIf,
        Self::Option,
        Self::Modules,
        Self::Transitional,
        Self::Optional,
        Self::Unknown,
    ];

    /// Configuration name of this kind (e.g. `"depends"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::DefType => "def",
            Self::Prompt => "prompt",
            Self::Default => "default",
            Self::DependsOn => "depends",
            Self::Select => "select",
            Self::Imply => "imply",
            Self::Range => "range",
            Self::VisibleIf => "visible",
            Self::Option => "option",
            Self::Modules => "modules",
            Self::Transitional => "transitional",
            Self::Optional => "optional",
            Self::Unknown => "unknown",
        }
    }

    /// Looks a kind up by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Leading keyword of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `config`
    Config,
    /// `menuconfig`
    MenuConfig,
    /// `choice`
    Choice,
    /// `endchoice`
    EndChoice,
    /// `menu`
    Menu,
    /// `endmenu`
    EndMenu,
    /// `if`
    If,
    /// `endif`
    EndIf,
    /// `source`, `rsource`, `osource`, `orsource`
    Source,
    /// `comment`
    Comment,
    /// `mainmenu`
    MainMenu,
    /// `help` or `---help---`
    Help,
    /// A property keyword.
    Property(PropertyKind),
}

impl Keyword {
    /// Classifies the first word of a line. Matching is case-sensitive.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "config" => Self::Config,
            "menuconfig" => Self::MenuConfig,
            "choice" => Self::Choice,
            "endchoice" => Self::EndChoice,
            "menu" => Self::Menu,
            "endmenu" => Self::EndMenu,
            "if" => Self::If,
            "endif" => Self::EndIf,
            "source" | "rsource" | "osource" | "orsource" => Self::Source,
            "comment" => Self::Comment,
            "mainmenu" => Self::MainMenu,
            "help" | "---help---" => Self::Help,
            "bool" | "boolean" | "tristate" | "string" | "hex" | "int" => {
                Self::Property(PropertyKind::Type)
            }
            "def_bool" | "def_tristate" | "def_int" | "def_hex" | "def_string" => {
                Self::Property(PropertyKind::DefType)
            }
            "prompt" => Self::Property(PropertyKind::Prompt),
            "default" => Self::Property(PropertyKind::Default),
            "depends" => Self::Property(PropertyKind::DependsOn),
            "select" => Self::Property(PropertyKind::Select),
            "imply" => Self::Property(PropertyKind::Imply),
            "range" => Self::Property(PropertyKind::Range),
            "visible" => Self::Property(PropertyKind::VisibleIf),
            "option" => Self::Property(PropertyKind::Option),
            "modules" => Self::Property(PropertyKind::Modules),
            "transitional" => Self::Property(PropertyKind::Transitional),
            "optional" => Self::Property(PropertyKind::Optional),
            _ => return None,
        };
        Some(keyword)
    }

    /// True for keywords that open or close an entry (anything but `help`
    /// and properties).
    #[must_use]
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Help | Self::Property(_))
    }
}

/// Classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Leading keyword.
    Keyword(Keyword),
    /// Symbol name after `config`, `menuconfig` or `choice`.
    Identifier,
    /// Quoted string.
    StringLiteral,
    /// Opaque remainder of the line; never interpreted.
    Expression,
    /// Full-line `#` comment.
    Comment,
}

/// A classified span of a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Absolute byte range in the source buffer.
    pub span: Range<usize>,
}

impl Token {
    /// Returns the token text, given the line it was lexed from.
    #[must_use]
    pub fn text<'a>(&self, line: &SourceLine<'a>) -> &'a str {
        &line.text[self.span.start - line.start..self.span.end - line.start]
    }
}

/// Splits one logical line into tokens.
///
/// Only the leading keyword and the token right after it are classified; the
/// rest of the line is kept as one opaque expression token.
#[must_use]
pub fn lex_line(line: &SourceLine<'_>) -> Vec<Token> {
    let content = line.content();
    let base = line.content_range().start;
    let mut tokens = Vec::new();

    if content.is_empty() {
        return tokens;
    }
    if content.starts_with('#') {
        tokens.push(Token {
            kind: TokenKind::Comment,
            span: base..base + content.len(),
        });
        return tokens;
    }

    let word_len = content.find(char::is_whitespace).unwrap_or(content.len());
    let Some(keyword) = Keyword::from_word(&content[..word_len]) else {
        tokens.push(Token {
            kind: TokenKind::Expression,
            span: base..base + content.len(),
        });
        return tokens;
    };

    let mut keyword_len = word_len;
    let second = match keyword {
        Keyword::Property(PropertyKind::DependsOn) => Some("on"),
        Keyword::Property(PropertyKind::VisibleIf) => Some("if"),
        _ => None,
    };
    if let Some(second) = second {
        let after = &content[word_len..];
        let trimmed = after.trim_start_matches(is_indent_char);
        let gap = after.len() - trimmed.len();
        let is_word = trimmed.starts_with(second)
            && trimmed[second.len()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
        if gap > 0 && is_word {
            keyword_len = word_len + gap + second.len();
        }
    }
    tokens.push(Token {
        kind: TokenKind::Keyword(keyword),
        span: base..base + keyword_len,
    });

    let after = &content[keyword_len..];
    let rest = after.trim_start_matches(is_indent_char);
    if rest.is_empty() {
        return tokens;
    }
    let rest_start = base + keyword_len + (after.len() - rest.len());

    let first_len = match keyword {
        Keyword::Config | Keyword::MenuConfig | Keyword::Choice => {
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(Token {
                kind: TokenKind::Identifier,
                span: rest_start..rest_start + len,
            });
            len
        }
        _ if rest.starts_with('"') || rest.starts_with('\'') => {
            let len = string_literal_len(rest);
            tokens.push(Token {
                kind: TokenKind::StringLiteral,
                span: rest_start..rest_start + len,
            });
            len
        }
        _ => 0,
    };

    let tail = &rest[first_len..];
    let trimmed = tail.trim_start_matches(is_indent_char);
    if !trimmed.is_empty() {
        let tail_start = rest_start + first_len + (tail.len() - trimmed.len());
        tokens.push(Token {
            kind: TokenKind::Expression,
            span: tail_start..tail_start + trimmed.len(),
        });
    }

    tokens
}

/// Length of a quoted string at the start of `text`, up to and including the
/// closing quote (or the whole text when unterminated).
fn string_literal_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    let Some((_, quote)) = chars.next() else {
        return 0;
    };
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_preserves_line_endings() {
        let lines = tokenize("config A\r\n\tbool\nendmenu");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].ending, LineEnding::CrLf);
        assert_eq!(lines[0].text, "config A");
        assert_eq!(lines[1].ending, LineEnding::Lf);
        assert_eq!(lines[1].start, 10);
        assert_eq!(lines[2].ending, LineEnding::None);
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn tokenize_empty_input_has_no_lines() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn tokenize_merges_continuations() {
        let text = "\tdepends on A && \\\n\t\tB\n\tdefault y\n";
        let lines = tokenize(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "\tdepends on A && \\\n\t\tB");
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].last_number, 2);
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn escaped_backslash_does_not_continue() {
        let lines = tokenize("\tdefault \"a\\\\\"\nconfig B\n");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn trailing_continuation_at_end_of_file() {
        let text = "config A \\\n";
        let lines = tokenize(text);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "config A \\");
        assert_eq!(lines[0].full_end(), text.len());
    }

    #[test]
    fn tokenize_covers_every_byte() {
        let text = "a\r\n\\\nb\n\n  c  ";
        let rebuilt: String = tokenize(text)
            .iter()
            .map(|l| format!("{}{}", l.text, l.ending.as_str()))
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn physical_lines_strip_inner_carriage_returns() {
        let lines = tokenize("a \\\r\n  b\r\n");
        let physical: Vec<_> = lines[0].physical_lines().collect();
        assert_eq!(physical.len(), 2);
        assert_eq!(physical[0].text, "a \\");
        assert_eq!(physical[1].text, "  b");
        assert_eq!(physical[1].number, 2);
        assert_eq!(physical[1].start, 5);
    }

    #[test]
    fn visual_width_expands_tabs() {
        assert_eq!(visual_width("\t"), 8);
        assert_eq!(visual_width("\t  "), 10);
        assert_eq!(visual_width("  \t"), 8);
        assert_eq!(visual_width("    "), 4);
    }

    #[test]
    fn content_excludes_surrounding_whitespace() {
        let lines = tokenize("\tbool \"x\"  \n");
        assert_eq!(lines[0].content(), "bool \"x\"");
        assert_eq!(lines[0].indent(), "\t");
        assert_eq!(lines[0].content_range(), 1..9);
    }

    #[test]
    fn lex_config_header() {
        let lines = tokenize("config FOO_BAR\n");
        let tokens = lex_line(&lines[0]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Config));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(&lines[0]), "FOO_BAR");
    }

    #[test]
    fn lex_depends_on_is_one_keyword() {
        let lines = tokenize("\tdepends on A || B\n");
        let tokens = lex_line(&lines[0]);
        assert_eq!(
            tokens[0].kind,
            TokenKind::Keyword(Keyword::Property(PropertyKind::DependsOn))
        );
        assert_eq!(tokens[0].text(&lines[0]), "depends on");
        assert_eq!(tokens[1].kind, TokenKind::Expression);
        assert_eq!(tokens[1].text(&lines[0]), "A || B");
    }

    #[test]
    fn lex_string_then_expression() {
        let lines = tokenize("\tbool \"Enable \\\"x\\\"\" if FOO\n");
        let tokens = lex_line(&lines[0]);
        assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].text(&lines[0]), "\"Enable \\\"x\\\"\"");
        assert_eq!(tokens[2].text(&lines[0]), "if FOO");
    }

    #[test]
    fn lex_comment_and_unknown() {
        let lines = tokenize("# hi\nsome random text\n");
        assert_eq!(lex_line(&lines[0])[0].kind, TokenKind::Comment);
        assert_eq!(lex_line(&lines[1])[0].kind, TokenKind::Expression);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(Keyword::from_word("Config"), None);
        assert_eq!(Keyword::from_word("---help---"), Some(Keyword::Help));
    }

    #[test]
    fn property_kind_names_round_trip() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_name(kind.name()), Some(kind));
        }
    }
}
