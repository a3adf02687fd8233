//! Token types produced by the marker scanner.

use quiver_common::Namespace;

/// A half-open byte range `[start, end)` into scanned text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span from start and end byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// The two marker calls recognized in package source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MarkerKind {
    /// `Declare("<namespace>")`, naming the package defined by a source unit.
    Declare,
    /// `Import("<namespace>")`, naming a dependency.
    Import,
}

/// A well-formed marker call and its literal namespace argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Marker {
    /// Which marker this is.
    pub kind: MarkerKind,
    /// The namespace argument.
    pub namespace: Namespace,
    /// Span of the whole call, from the marker name through the closing `)`.
    pub span: Span,
}

/// A token emitted by [`scan`](crate::scan).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    /// A complete marker call.
    Marker(Marker),
    /// A closed marker call whose argument is not a valid namespace.
    Invalid {
        /// Which marker this is.
        kind: MarkerKind,
        /// Span of the whole call.
        span: Span,
    },
    /// A marker call with no closing quote or parenthesis. Scanning stopped
    /// here; text from `offset` onward was not examined. Always the last token.
    Truncated {
        /// Byte offset where the malformed marker begins.
        offset: usize,
    },
}

impl Token {
    /// Returns the marker if this token is a complete marker call.
    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Token::Marker(m) => Some(m),
            Token::Invalid { .. } | Token::Truncated { .. } => None,
        }
    }
}
