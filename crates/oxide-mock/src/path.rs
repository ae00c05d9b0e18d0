//! Path template parsing and matching.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// `{name}`, `{.name}`, `{;name}`, each optionally followed by `*`.
static PARAM_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([.;]?)(.+?)(\*)?\}$").expect("Invalid parameter segment regex")
});

/// How a parameter value is serialized in the path.
///
/// The style does not change matching; the whole raw segment is bound
/// either way. It is kept so consumers can interpret the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `{name}`
    Simple,
    /// `{.name}`
    Label,
    /// `{;name}`
    Matrix,
}

/// A parameter segment (e.g., `{petId}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSegment {
    /// Name the matched value is bound to.
    pub name: String,
    /// Serialization style.
    pub style: ParamStyle,
    /// Whether the template marked the value as multi-valued (`*`).
    pub explode: bool,
}

/// A segment in a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal string segment.
    Literal(String),
    /// A parameter segment.
    Param(ParamSegment),
}

impl PathSegment {
    /// Parses a single `/`-free piece of a template.
    ///
    /// Anything that is not a well-formed `{...}` wrapper is a literal,
    /// including pieces with stray braces.
    pub fn parse(piece: &str) -> Self {
        let Some(caps) = PARAM_SEGMENT.captures(piece) else {
            return Self::Literal(piece.to_string());
        };
        let style = match caps.get(1).map_or("", |m| m.as_str()) {
            "." => ParamStyle::Label,
            ";" => ParamStyle::Matrix,
            _ => ParamStyle::Simple,
        };
        Self::Param(ParamSegment {
            name: caps[2].to_string(),
            style,
            explode: caps.get(3).is_some(),
        })
    }

    /// Returns true for literal segments.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Splits a path on `/`, dropping empty pieces.
///
/// Leading, trailing, and repeated slashes therefore never matter.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// The template text as declared.
    template: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
}

impl PathTemplate {
    /// Parses a path template.
    ///
    /// Parsing never fails; see [`PathTemplate::validate`] for the checks
    /// applied when a handler is built.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_mock::PathTemplate;
    ///
    /// let template = PathTemplate::parse("/pet/{petId}");
    /// let params = template.match_path("/pet/123").unwrap();
    /// assert_eq!(params.get("petId"), Some("123"));
    /// assert!(template.match_path("/pet/123/photos").is_none());
    /// ```
    pub fn parse(template: &str) -> Self {
        Self {
            template: template.to_string(),
            segments: split_path(template).map(PathSegment::parse).collect(),
        }
    }

    /// Returns a copy with literal segments prepended.
    ///
    /// Used to apply a base path; the text is rebuilt to match.
    #[must_use]
    pub fn prefixed(&self, prefix: &[String]) -> Self {
        if prefix.is_empty() {
            return self.clone();
        }
        let mut template = String::new();
        for segment in prefix {
            template.push('/');
            template.push_str(segment);
        }
        template.push_str(&self.template);

        let mut segments: Vec<PathSegment> =
            prefix.iter().cloned().map(PathSegment::Literal).collect();
        segments.extend(self.segments.iter().cloned());

        Self { template, segments }
    }

    /// Attempts to match a request path against this template.
    ///
    /// Returns the bound parameters (possibly none) on success.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let request_segments: Vec<&str> = split_path(path).collect();
        if request_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, actual) in self.segments.iter().zip(request_segments) {
            match segment {
                PathSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PathSegment::Param(param) => params.insert(param.name.as_str(), actual),
            }
        }

        Some(params)
    }

    /// Rejects parameter segments that cannot be bound sensibly.
    ///
    /// Stray braces inside a literal are allowed; a bare `{}` is not, nor
    /// are parameter names that are reused within the template.
    pub fn validate(&self) -> Result<()> {
        if self.segments.iter().any(|s| matches!(s, PathSegment::Literal(t) if t == "{}")) {
            return Err(self.invalid("empty parameter name"));
        }

        let mut seen = HashSet::new();
        for name in self.param_names() {
            if name.starts_with(['.', ';']) || name.contains(['{', '}', '*']) {
                return Err(self.invalid(format!("malformed parameter name {name:?}")));
            }
            if !seen.insert(name) {
                return Err(RouterError::DuplicateParameter {
                    template: self.template.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> RouterError {
        RouterError::InvalidTemplate {
            template: self.template.clone(),
            reason: reason.into(),
        }
    }

    /// Orders templates so the more specific one comes first.
    ///
    /// Longer templates first, then those with more literals, then the one
    /// whose first differing position is a literal. Templates with the same
    /// shape compare equal.
    pub fn compare_specificity(&self, other: &Self) -> Ordering {
        other
            .len()
            .cmp(&self.len())
            .then_with(|| other.literal_count().cmp(&self.literal_count()))
            .then_with(|| {
                self.segments
                    .iter()
                    .zip(&other.segments)
                    .map(|(a, b)| b.is_literal().cmp(&a.is_literal()))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// Returns the template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root template.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of literal segments.
    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_literal()).count()
    }

    /// Returns the parameter names in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Param(p) => Some(p.name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}
