//! Handler construction options.

use serde::Deserialize;

use crate::error::{Result, RouterError};
use crate::path::split_path;

/// Options applied once when a handler is built.
///
/// Deserializes from camelCase keys (`basePath`, `returnUndefinedOnNoMatch`);
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerOptions {
    /// Prefix prepended to every route. Must start with `/`.
    pub base_path: String,
    /// Report an unmatched request as `None` instead of a 404 response.
    #[serde(rename = "returnUndefinedOnNoMatch", alias = "returnNoneOnNoMatch")]
    pub return_none_on_no_match: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            return_none_on_no_match: false,
        }
    }
}

impl HandlerOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base path.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets whether unmatched requests yield `None`.
    #[must_use]
    pub fn return_none_on_no_match(mut self, enabled: bool) -> Self {
        self.return_none_on_no_match = enabled;
        self
    }

    /// Resolves the options into what route entries need.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        if !self.base_path.starts_with('/') {
            return Err(RouterError::InvalidBasePath(self.base_path.clone()));
        }
        Ok(ResolvedOptions {
            base_segments: split_path(&self.base_path).map(str::to_string).collect(),
        })
    }
}

/// Options in the form route declarations consume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Literal segments of the base path.
    pub base_segments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = HandlerOptions::default();
        assert_eq!(opts.base_path, "/");
        assert!(!opts.return_none_on_no_match);
        assert!(opts.resolve().unwrap().base_segments.is_empty());
    }

    #[test]
    fn test_resolve_base_path() {
        let resolved = HandlerOptions::new().base_path("/api/v3/").resolve().unwrap();
        assert_eq!(resolved.base_segments, vec!["api", "v3"]);
    }

    #[test]
    fn test_base_path_must_start_with_slash() {
        let err = HandlerOptions::new().base_path("api").resolve().unwrap_err();
        assert!(matches!(err, RouterError::InvalidBasePath(ref p) if p == "api"));
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: HandlerOptions = serde_json::from_str(r#"{"basePath": "/api"}"#).unwrap();
        assert_eq!(opts.base_path, "/api");
        assert!(!opts.return_none_on_no_match);

        let opts: HandlerOptions =
            serde_json::from_str(r#"{"returnUndefinedOnNoMatch": true}"#).unwrap();
        assert_eq!(opts.base_path, "/");
        assert!(opts.return_none_on_no_match);

        let opts: HandlerOptions =
            serde_json::from_str(r#"{"returnNoneOnNoMatch": true}"#).unwrap();
        assert!(opts.return_none_on_no_match);
    }
}
