//! The seam to the external code transformer.

use crate::error::TransformError;

/// Turns raw package source into deliverable compiled code.
///
/// Implementations must be deterministic: the same input always yields the
/// same output, since the content hash is computed from the output. They
/// fail only on input they cannot process.
pub trait Transformer: Send + Sync {
    /// Transforms one source unit.
    fn transform(&self, raw: &str) -> Result<String, TransformError>;
}

impl<F> Transformer for F
where
    F: Fn(&str) -> Result<String, TransformError> + Send + Sync,
{
    fn transform(&self, raw: &str) -> Result<String, TransformError> {
        self(raw)
    }
}

/// Delivers source unchanged, apart from surrounding whitespace.
///
/// Used when sources are already compiled ahead of time. Blank input is
/// rejected so an empty file never becomes an empty package.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Transformer for Verbatim {
    fn transform(&self, raw: &str) -> Result<String, TransformError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TransformError::Empty);
        }
        Ok(trimmed.to_string())
    }
}
