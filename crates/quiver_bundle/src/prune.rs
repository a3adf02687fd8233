//! Removal of dependency markers from delivered code.
//!
//! Every dependency a client needs is delivered in the same bundle or is
//! already in its cache, so most import calls are dead weight once the
//! bundle is assembled. An import is kept only when its target is in the
//! manifest-filter set, leaving the client runtime to resolve it from its
//! own cache.

use std::borrow::Cow;
use std::collections::HashSet;

use quiver_common::Namespace;
use quiver_markers::{scan_imports, MarkerKind, MarkerSet, Token};
use serde::{Deserialize, Serialize};

/// Which dependency markers [`prune_imports`] removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PruneMode {
    /// Remove imports whose target is not in the filter set.
    #[default]
    OutsideFilter,
    /// Remove every import regardless of the filter set.
    StripAll,
}

/// Removes dependency markers from `code`.
///
/// Each removed call takes its argument with it, plus one `;` directly
/// following the closing parenthesis. A call whose argument is not a valid
/// namespace can never be in the filter set and is always removed. Everything else is copied verbatim,
/// including text after a malformed marker. Returns the input borrowed when
/// nothing is removed.
pub fn prune_imports<'a>(
    code: &'a str,
    markers: &MarkerSet,
    filter: &HashSet<Namespace>,
    mode: PruneMode,
) -> Cow<'a, str> {
    let mut out = String::new();
    let mut copied = 0;
    for token in scan_imports(code, markers) {
        let (span, keep) = match token {
            Token::Marker(marker) if marker.kind == MarkerKind::Import => {
                let keep = match mode {
                    PruneMode::OutsideFilter => filter.contains(marker.namespace.as_str()),
                    PruneMode::StripAll => false,
                };
                (marker.span, keep)
            }
            Token::Invalid { kind: MarkerKind::Import, span } => (span, false),
            Token::Marker(_) | Token::Invalid { .. } => continue,
            Token::Truncated { .. } => break,
        };
        if keep {
            continue;
        }
        out.push_str(&code[copied..span.start]);
        copied = span.end;
        if code[copied..].starts_with(';') {
            copied += 1;
        }
    }
    if copied == 0 {
        return Cow::Borrowed(code);
    }
    out.push_str(&code[copied..]);
    Cow::Owned(out)
}
