//! Resolve requests and responses.

use std::collections::BTreeMap;

use quiver_bundle::ManifestEntry;
use quiver_common::{ContentHash, Namespace, VersionLabel};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A client asking for a package and everything it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// The entry-point package.
    pub namespace: Namespace,
    /// Version scope to resolve in; `None` for the unversioned scope.
    #[serde(default)]
    pub version: Option<VersionLabel>,
    /// Raw `namespace → hash` pairs the client reports holding. Malformed
    /// pairs are ignored, so the client receives those packages again.
    #[serde(default)]
    pub cache: BTreeMap<String, String>,
}

impl ResolveRequest {
    /// A request from a client with a cold cache.
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            version: None,
            cache: BTreeMap::new(),
        }
    }

    /// Sets the version scope.
    pub fn with_version(mut self, version: Option<VersionLabel>) -> Self {
        self.version = version;
        self
    }

    /// Adds one reported cache entry.
    pub fn with_cached(mut self, namespace: impl Into<String>, hash: impl Into<String>) -> Self {
        self.cache.insert(namespace.into(), hash.into());
        self
    }

    /// Builds a request from a URL path and query string.
    ///
    /// The path names the package as described by [`RequestPath::parse`];
    /// each `key=value` query pair is taken as a reported cache entry. Keys
    /// and values are percent-decoded; a pair that does not decode to UTF-8
    /// is dropped.
    pub fn from_url(url: &str, versioned: bool) -> Result<Self, ServiceError> {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let RequestPath { version, namespace } = RequestPath::parse(path, versioned)?;
        let cache = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter_map(|(key, value)| {
                let key = urlencoding::decode(key).ok()?;
                let value = urlencoding::decode(value).ok()?;
                Some((key.into_owned(), value.into_owned()))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Ok(Self {
            namespace,
            version,
            cache,
        })
    }
}

/// The package named by a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    /// Version scope, present only in versioned mode.
    pub version: Option<VersionLabel>,
    /// The requested package.
    pub namespace: Namespace,
}

impl RequestPath {
    /// Maps a request path to a package.
    ///
    /// The directory part of the path is the namespace and the final
    /// segment (a file name) is ignored: `/app/ui/Button/index.js` names
    /// `app.ui.Button`. In versioned mode the first directory is the
    /// version label: `/v2/app/ui/Button/index.js` names `app.ui.Button`
    /// in scope `v2`. Segments are percent-decoded before use.
    pub fn parse(path: &str, versioned: bool) -> Result<Self, ServiceError> {
        let invalid = |reason: String| ServiceError::InvalidPath {
            path: path.to_string(),
            reason,
        };
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must start with '/'".to_string()))?;
        let mut dirs = rest
            .split('/')
            .map(|segment| urlencoding::decode(segment).map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        dirs.pop();

        let version = if versioned {
            if dirs.is_empty() {
                return Err(invalid("missing version segment".to_string()));
            }
            let label = dirs.remove(0);
            Some(VersionLabel::new(label).map_err(|e| invalid(e.to_string()))?)
        } else {
            None
        };
        if dirs.is_empty() {
            return Err(invalid("no namespace segments".to_string()));
        }
        let namespace = Namespace::from_segments(dirs.iter().map(|d| &**d))
            .map_err(|e| invalid(e.to_string()))?;
        Ok(Self { version, namespace })
    }
}

/// One package in a structured response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveredPackage {
    /// Namespace of the package.
    pub namespace: Namespace,
    /// Content hash of `code`.
    pub hash: ContentHash,
    /// Compiled code, with dependency markers intact.
    pub code: String,
}

/// Structured answer to a [`ResolveRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveResponse {
    /// The requested entry point.
    pub namespace: Namespace,
    /// Version scope the request was resolved in.
    pub version: Option<VersionLabel>,
    /// Packages the client is missing, sorted by namespace.
    pub packages: Vec<DeliveredPackage>,
    /// `namespace → hash` pairs for the client to record, in package order.
    pub manifest: Vec<ManifestEntry>,
}

impl ResolveResponse {
    /// Returns `true` if the client already holds everything it asked for.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_to_namespace() {
        let parsed = RequestPath::parse("/app/ui/Button/index.js", false).unwrap();
        assert_eq!(parsed.namespace.as_str(), "app.ui.Button");
        assert!(parsed.version.is_none());
    }

    #[test]
    fn versioned_path() {
        let parsed = RequestPath::parse("/v2/app/ui/Button/index.js", true).unwrap();
        assert_eq!(parsed.version.unwrap().as_str(), "v2");
        assert_eq!(parsed.namespace.as_str(), "app.ui.Button");
    }

    #[test]
    fn trailing_slash_names_directory() {
        let parsed = RequestPath::parse("/app/Main/", false).unwrap();
        assert_eq!(parsed.namespace.as_str(), "app.Main");
    }

    #[test]
    fn file_at_root_is_rejected() {
        let err = RequestPath::parse("/index.js", false).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPath { .. }));
        let err = RequestPath::parse("/v1/index.js", true).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPath { .. }));
    }

    #[test]
    fn relative_and_malformed_paths_are_rejected() {
        assert!(RequestPath::parse("app/Main/x.js", false).is_err());
        assert!(RequestPath::parse("/app//Main/x.js", false).is_err());
    }

    #[test]
    fn url_query_becomes_cache() {
        let hash = ContentHash::of("b").to_string();
        let url = format!("/app/Main/x.js?app.B={hash}&callback=cb&&flag");
        let request = ResolveRequest::from_url(&url, false).unwrap();
        assert_eq!(request.namespace.as_str(), "app.Main");
        assert_eq!(request.cache.get("app.B"), Some(&hash));
        assert_eq!(request.cache.get("callback").map(String::as_str), Some("cb"));
        assert_eq!(request.cache.len(), 2);
    }

    #[test]
    fn url_query_is_percent_decoded() {
        let hash = ContentHash::of("b").to_string();
        let url = format!("/app/Main/x.js?app%2EB={hash}&name=a%20b&bad=%FF");
        let request = ResolveRequest::from_url(&url, false).unwrap();
        assert_eq!(request.cache.get("app.B"), Some(&hash));
        assert_eq!(request.cache.get("name").map(String::as_str), Some("a b"));
        assert!(!request.cache.contains_key("bad"));
    }

    #[test]
    fn path_segments_are_percent_decoded() {
        let parsed = RequestPath::parse("/v%32/app/Ma%69n/x.js", true).unwrap();
        assert_eq!(parsed.version.unwrap().as_str(), "v2");
        assert_eq!(parsed.namespace.as_str(), "app.Main");
        assert!(RequestPath::parse("/app/%FF/x.js", false).is_err());
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: ResolveRequest = serde_json::from_str(r#"{"namespace":"app.Main"}"#).unwrap();
        assert_eq!(request, ResolveRequest::new(Namespace::new("app.Main").unwrap()));
    }

    #[test]
    fn builder_methods() {
        let request = ResolveRequest::new(Namespace::new("a").unwrap())
            .with_version(Some(VersionLabel::new("1.0").unwrap()))
            .with_cached("b", "00");
        assert_eq!(request.version.unwrap().as_str(), "1.0");
        assert_eq!(request.cache.len(), 1);
    }
}
