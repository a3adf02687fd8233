//! Marker scanner for compiled package source.
//!
//! Walks the text byte by byte looking for marker names at identifier
//! boundaries. A name followed by `(` and a quote opens a marker call; the
//! call must close with the same quote and then `)`. ASCII whitespace is
//! allowed inside the parentheses around the quoted argument. Anything else
//! after the name is ordinary code and is skipped. A call that never closes
//! ends the scan with a [`Token::Truncated`], keeping every marker found
//! before it.

use quiver_common::Namespace;

use crate::markers::{is_marker_byte, MarkerSet};
use crate::token::{Marker, MarkerKind, Span, Token};

/// Scans `text` for the given `(name, kind)` marker patterns.
///
/// Tokens are returned in source order. When two patterns match at the same
/// position the longer name wins. Calls whose argument is not a valid
/// [`Namespace`] come back as [`Token::Invalid`].
pub fn scan(text: &str, patterns: &[(&str, MarkerKind)]) -> Vec<Token> {
    let mut patterns: Vec<(&str, MarkerKind)> = patterns
        .iter()
        .copied()
        .filter(|(name, _)| !name.is_empty())
        .collect();
    patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut scanner = Scanner {
        source: text.as_bytes(),
        text,
        pos: 0,
    };
    scanner.scan_all(&patterns)
}

/// Scans `text` for canonical dependency markers only.
///
/// The text is expected to be normalized already; aliases are not rewritten.
pub fn scan_imports(text: &str, markers: &MarkerSet) -> Vec<Token> {
    scan(text, &markers.import_patterns())
}

struct Scanner<'a> {
    source: &'a [u8],
    text: &'a str,
    pos: usize,
}

/// Outcome of trying to read a marker call at a given position.
enum Call {
    /// A closed call; `end` is one past the `)`.
    Closed { arg: Span, end: usize },
    /// The name is not followed by `(` and a quote.
    NotACall,
    /// The call opened but never closed.
    Unterminated,
}

impl Scanner<'_> {
    fn scan_all(&mut self, patterns: &[(&str, MarkerKind)]) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.pos < self.source.len() {
            let Some((name, kind)) = self.match_pattern(patterns) else {
                self.pos += 1;
                continue;
            };
            let start = self.pos;
            match self.read_call(start + name.len()) {
                Call::Closed { arg, end } => {
                    let span = Span::new(start, end);
                    let literal = &self.text[arg.start..arg.end];
                    tokens.push(match Namespace::new(literal) {
                        Ok(namespace) => Token::Marker(Marker {
                            kind,
                            namespace,
                            span,
                        }),
                        Err(_) => Token::Invalid { kind, span },
                    });
                    self.pos = end;
                }
                Call::NotACall => {
                    self.pos = start + name.len();
                }
                Call::Unterminated => {
                    tokens.push(Token::Truncated { offset: start });
                    break;
                }
            }
        }
        tokens
    }

    /// Returns the pattern whose name starts at the current position, if the
    /// position is an identifier boundary.
    fn match_pattern<'p>(
        &self,
        patterns: &[(&'p str, MarkerKind)],
    ) -> Option<(&'p str, MarkerKind)> {
        if self.pos > 0 && is_ident_byte(self.source[self.pos - 1]) {
            return None;
        }
        let rest = &self.source[self.pos..];
        patterns
            .iter()
            .copied()
            .find(|(name, _)| rest.starts_with(name.as_bytes()))
    }

    fn read_call(&self, after_name: usize) -> Call {
        let mut p = after_name;
        if self.byte_at(p) != Some(b'(') {
            return Call::NotACall;
        }
        p = self.skip_whitespace(p + 1);
        let quote = match self.byte_at(p) {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Call::NotACall,
        };
        p += 1;
        let arg_start = p;
        while let Some(b) = self.byte_at(p) {
            if b == quote {
                break;
            }
            if b == b'\n' {
                return Call::Unterminated;
            }
            p += 1;
        }
        if self.byte_at(p) != Some(quote) {
            return Call::Unterminated;
        }
        let arg = Span::new(arg_start, p);
        p = self.skip_whitespace(p + 1);
        if self.byte_at(p) != Some(b')') {
            return Call::Unterminated;
        }
        Call::Closed { arg, end: p + 1 }
    }

    fn skip_whitespace(&self, mut idx: usize) -> usize {
        while self.byte_at(idx).is_some_and(|b| b.is_ascii_whitespace()) {
            idx += 1;
        }
        idx
    }

    fn byte_at(&self, idx: usize) -> Option<u8> {
        self.source.get(idx).copied()
    }
}

fn is_ident_byte(b: u8) -> bool {
    is_marker_byte(b) && b != b'.'
}
