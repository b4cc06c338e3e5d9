//! Region scanner: finds the parts of a line that no rule may touch.
//!
//! The scan is a single left-to-right walk, so the three categories can
//! never overlap: a `//` inside a string literal is just text, and a `"`
//! inside a comment does not open a literal.
//
//  Lexical items (one physical line at a time):
//
//      StringLiteral ::= '"' ( '\' any | [^"\\] )* '"'   (or to end of line)
//      LineComment   ::= '//' .*
//      BlockComment  ::= '/*' .*? '*/'                    (or to end of line)
//
//  Character literals ('"', '\'') are stepped over so they cannot open a
//  bogus string literal, but they are not protected themselves.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    StringLiteral,
    LineComment,
    BlockComment,
}

impl SpanKind {
    pub fn is_comment(self) -> bool {
        matches!(self, SpanKind::LineComment | SpanKind::BlockComment)
    }
}

/// Half-open byte range `[start, start + len)` inside one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub start: usize,
    pub len: usize,
    pub kind: SpanKind,
}

impl ProtectedSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end()
    }

    /// True if the span shares at least one byte with `[start, end)`.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end()
    }
}

struct Scanner<'a> {
    line: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            chars: line.char_indices().peekable(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Byte offset of the next unread char (line length at the end).
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.line.len(), |&(i, _)| i)
    }

    /// Consumes up to and including `quote`, honouring backslash escapes.
    fn skip_quoted(&mut self, quote: char) {
        while let Some((_, c)) = self.chars.next() {
            if c == '\\' {
                self.chars.next();
            } else if c == quote {
                return;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        while let Some((_, c)) = self.chars.next() {
            if c == '*' && self.peek_char() == Some('/') {
                self.chars.next();
                return;
            }
        }
    }

    fn run(mut self) -> Vec<ProtectedSpan> {
        let mut spans = Vec::new();

        while let Some((start, c)) = self.chars.next() {
            let kind = match c {
                '"' => {
                    self.skip_quoted('"');
                    SpanKind::StringLiteral
                }
                '\'' => {
                    self.skip_quoted('\'');
                    continue;
                }
                '/' if self.peek_char() == Some('/') => {
                    // everything up to the end of the line
                    while self.chars.next().is_some() {}
                    SpanKind::LineComment
                }
                '/' if self.peek_char() == Some('*') => {
                    self.chars.next();
                    self.skip_block_comment();
                    SpanKind::BlockComment
                }
                _ => continue,
            };

            let end = self.offset();
            spans.push(ProtectedSpan {
                start,
                len: end - start,
                kind,
            });
        }

        spans
    }
}

/// Returns the protected spans of `line`, sorted by `start`, non-overlapping.
pub fn scan(line: &str) -> Vec<ProtectedSpan> {
    Scanner::new(line).run()
}

/// Where the run of comments ending `line` begins, if it ends with any.
/// Both `// …` and `/* … */` count, as do several separated by whitespace.
pub fn trailing_comment(line: &str, spans: &[ProtectedSpan]) -> Option<usize> {
    let mut tail = line.trim_end().len();
    let mut start = None;
    for span in spans.iter().rev() {
        if !span.kind.is_comment() || span.end() < tail {
            break;
        }
        start = Some(span.start);
        tail = line[..span.start].trim_end().len();
    }
    start
}
