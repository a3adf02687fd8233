//! Marker names and legacy alias normalization.

use std::borrow::Cow;

use crate::token::MarkerKind;

/// Default name of the package-declaration marker.
pub const DEFAULT_DECLARE: &str = "Declare";

/// Default name of the dependency marker.
pub const DEFAULT_IMPORT: &str = "Import";

/// Errors raised when building a [`MarkerSet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
    /// A canonical marker name is empty or contains a character outside
    /// `[A-Za-z0-9_$.]`.
    #[error("invalid marker name '{0}'")]
    InvalidName(String),

    /// The declaration and dependency markers share a name.
    #[error("declaration and import markers must differ, both are '{0}'")]
    SameName(String),

    /// An alias is empty or contains whitespace.
    #[error("invalid import alias '{0}'")]
    InvalidAlias(String),

    /// An alias occurs inside a canonical marker name, so normalizing it
    /// would corrupt every canonical marker.
    #[error("import alias '{alias}' occurs inside canonical marker '{canonical}'")]
    AliasOverlap {
        /// The rejected alias.
        alias: String,
        /// The canonical name containing it.
        canonical: String,
    },
}

/// The configured marker names and the aliases normalized to the import marker.
///
/// Aliases are replaced literally, left to right, in configuration order,
/// before any dependency scanning. That lets legacy spellings such as
/// `require` extract exactly like `Import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    declare: String,
    import: String,
    aliases: Vec<String>,
}

impl MarkerSet {
    /// Creates a marker set with custom names and aliases.
    pub fn new(
        declare: impl Into<String>,
        import: impl Into<String>,
        aliases: Vec<String>,
    ) -> Result<Self, MarkerError> {
        let declare = declare.into();
        let import = import.into();
        for name in [&declare, &import] {
            if name.is_empty() || !name.bytes().all(is_marker_byte) {
                return Err(MarkerError::InvalidName(name.clone()));
            }
        }
        if declare == import {
            return Err(MarkerError::SameName(declare));
        }
        for alias in &aliases {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(MarkerError::InvalidAlias(alias.clone()));
            }
            for canonical in [&declare, &import] {
                if canonical.contains(alias.as_str()) {
                    return Err(MarkerError::AliasOverlap {
                        alias: alias.clone(),
                        canonical: canonical.clone(),
                    });
                }
            }
        }
        Ok(Self {
            declare,
            import,
            aliases,
        })
    }

    /// Returns a copy of this set with the given aliases.
    pub fn with_aliases(self, aliases: Vec<String>) -> Result<Self, MarkerError> {
        Self::new(self.declare, self.import, aliases)
    }

    /// Name of the package-declaration marker.
    pub fn declare(&self) -> &str {
        &self.declare
    }

    /// Name of the canonical dependency marker.
    pub fn import(&self) -> &str {
        &self.import
    }

    /// Configured legacy aliases of the dependency marker.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Scanner patterns recognizing only declaration markers.
    pub fn declare_patterns(&self) -> [(&str, MarkerKind); 1] {
        [(self.declare.as_str(), MarkerKind::Declare)]
    }

    /// Scanner patterns recognizing only the canonical dependency marker.
    pub fn import_patterns(&self) -> [(&str, MarkerKind); 1] {
        [(self.import.as_str(), MarkerKind::Import)]
    }

    /// Rewrites every alias occurrence to the canonical import marker.
    ///
    /// Borrows the input unchanged when no alias occurs in it.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for alias in &self.aliases {
            if out.contains(alias.as_str()) {
                out = Cow::Owned(out.replace(alias.as_str(), &self.import));
            }
        }
        out
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            declare: DEFAULT_DECLARE.to_string(),
            import: DEFAULT_IMPORT.to_string(),
            aliases: Vec::new(),
        }
    }
}

/// Bytes allowed in a canonical marker name.
pub(crate) fn is_marker_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_names() {
        let m = MarkerSet::default();
        assert_eq!(m.declare(), "Declare");
        assert_eq!(m.import(), "Import");
        assert!(m.aliases().is_empty());
    }

    #[test]
    fn normalize_without_aliases_borrows() {
        let m = MarkerSet::default();
        assert!(matches!(m.normalize("Import(\"a\")"), Cow::Borrowed(_)));
    }

    #[test]
    fn normalize_rewrites_every_alias() {
        let m = MarkerSet::default()
            .with_aliases(aliases(&["require", "Lib.use"]))
            .unwrap();
        let out = m.normalize("require(\"a\");Lib.use(\"b\");require(\"c\")");
        assert_eq!(out, "Import(\"a\");Import(\"b\");Import(\"c\")");
    }

    #[test]
    fn normalize_untouched_when_alias_absent() {
        let m = MarkerSet::default().with_aliases(aliases(&["require"])).unwrap();
        assert!(matches!(m.normalize("var x = 1;"), Cow::Borrowed(_)));
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(
            MarkerSet::new("", "Import", vec![]),
            Err(MarkerError::InvalidName(String::new()))
        );
        assert!(matches!(
            MarkerSet::new("Declare", "Im port", vec![]),
            Err(MarkerError::InvalidName(_))
        ));
        assert!(matches!(
            MarkerSet::new("Same", "Same", vec![]),
            Err(MarkerError::SameName(_))
        ));
    }

    #[test]
    fn rejects_bad_aliases() {
        assert!(matches!(
            MarkerSet::new("Declare", "Import", aliases(&[""])),
            Err(MarkerError::InvalidAlias(_))
        ));
        assert!(matches!(
            MarkerSet::new("Declare", "Import", aliases(&["port"])),
            Err(MarkerError::AliasOverlap { .. })
        ));
    }

    #[test]
    fn overlap_error_names_both_sides() {
        let err = MarkerSet::new("Declare", "Import", aliases(&["clar"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("clar"));
        assert!(msg.contains("Declare"));
    }
}
