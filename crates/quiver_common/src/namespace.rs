//! Package namespaces and version labels.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A hierarchical, dot-delimited package identifier such as `app.ui.Button`.
///
/// A namespace names exactly one package within a version scope. Segments
/// must be non-empty and the text may not contain whitespace, quotes, or
/// parentheses, since namespaces are embedded verbatim in marker calls.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

/// Errors produced when validating a [`Namespace`] or [`VersionLabel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    /// The input is empty.
    #[error("namespace is empty")]
    Empty,

    /// The input contains an empty segment (leading, trailing, or doubled dot).
    #[error("namespace '{0}' has an empty segment")]
    EmptySegment(String),

    /// The input contains a character that cannot appear in a namespace.
    #[error("namespace '{text}' contains invalid character {ch:?}")]
    InvalidChar {
        /// The rejected input.
        text: String,
        /// The offending character.
        ch: char,
    },

    /// A version label is empty or contains a path separator.
    #[error("invalid version label '{0}'")]
    InvalidVersion(String),
}

impl Namespace {
    /// Validates and wraps a namespace string.
    pub fn new(text: impl Into<String>) -> Result<Self, NamespaceError> {
        let text = text.into();
        if text.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if let Some(ch) = text.chars().find(|&c| !is_namespace_char(c)) {
            return Err(NamespaceError::InvalidChar { text, ch });
        }
        if text.split('.').any(str::is_empty) {
            return Err(NamespaceError::EmptySegment(text));
        }
        Ok(Self(text))
    }

    /// Returns the namespace as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a namespace by joining path-like segments with dots.
    pub fn from_segments<'a>(
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, NamespaceError> {
        let joined: Vec<&str> = segments.into_iter().collect();
        Self::new(joined.join("."))
    }
}

fn is_namespace_char(c: char) -> bool {
    !(c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')' | '/' | '\\'))
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Namespace {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl Borrow<str> for Namespace {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.0)
    }
}

/// Opaque partition key selecting one version scope of the registry.
///
/// Quiver never interprets the label; it is supplied by the caller (or by
/// the directory loader, which uses first-level directory names).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionLabel(String);

impl VersionLabel {
    /// Validates and wraps a version label. Labels must be non-empty and
    /// free of `/` so they can be carried in a request path.
    pub fn new(label: impl Into<String>) -> Result<Self, NamespaceError> {
        let label = label.into();
        if label.is_empty() || label.contains('/') {
            return Err(NamespaceError::InvalidVersion(label));
        }
        Ok(Self(label))
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VersionLabel {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for VersionLabel {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VersionLabel> for String {
    fn from(label: VersionLabel) -> Self {
        label.0
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
