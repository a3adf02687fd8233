//! Package declaration detection and dependency extraction.

use quiver_common::Namespace;

use crate::markers::MarkerSet;
use crate::scanner::{scan, scan_imports};
use crate::token::Token;

/// Returns the namespace declared by a source unit, if any.
///
/// Only the first well-formed declaration marker counts. A source unit
/// without one is not a package.
pub fn find_declaration(source: &str, markers: &MarkerSet) -> Option<Namespace> {
    scan(source, &markers.declare_patterns())
        .into_iter()
        .find_map(|token| match token {
            Token::Marker(m) => Some(m.namespace),
            Token::Invalid { .. } | Token::Truncated { .. } => None,
        })
}

/// Extracts the declared dependencies of a package from its compiled code.
///
/// Aliases are normalized to the canonical import marker first. Results
/// are in source order and may contain duplicates. A malformed marker ends
/// extraction; everything captured before it is returned.
pub fn extract_dependencies(code: &str, markers: &MarkerSet) -> Vec<Namespace> {
    let normalized = markers.normalize(code);
    scan_imports(&normalized, markers)
        .into_iter()
        .filter_map(|token| match token {
            Token::Marker(m) => Some(m.namespace),
            Token::Invalid { .. } | Token::Truncated { .. } => None,
        })
        .collect()
}
