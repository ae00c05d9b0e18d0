//! HTTP request type.

use std::collections::HashMap;

use url::form_urlencoded;

/// HTTP request methods a route can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// PUT method
    Put,
    /// POST method
    Post,
    /// DELETE method
    Delete,
    /// OPTIONS method
    Options,
    /// HEAD method
    Head,
    /// PATCH method
    Patch,
    /// TRACE method
    Trace,
}

impl Method {
    /// All methods, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Parses a method from a string, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.matches(s))
    }

    /// Returns the method as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Returns true if a raw request method names this method.
    pub fn matches(&self, raw: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(raw)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path parameters extracted from the URL.
///
/// Values are the raw request segments; nothing is decoded or coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Gets a parameter value or returns an error.
    pub fn require(&self, key: &str) -> Result<&str, String> {
        self.get(key)
            .ok_or_else(|| format!("Missing path parameter: {key}"))
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameters were bound.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Query string parameters, in the order they appear.
///
/// A key may occur several times; [`QueryParams::get`] returns the first
/// value and [`QueryParams::get_all`] returns every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses a query string (without the leading `?`).
    ///
    /// Uses `application/x-www-form-urlencoded` rules: `+` is a space and
    /// percent escapes are decoded.
    pub fn parse(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Gets the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets every value for a key.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Raw HTTP method, compared case-insensitively against routes.
    pub method: String,
    /// Request target: an absolute URL or an origin-form path with query.
    pub target: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get.as_str(), target)
    }

    /// Creates a POST request.
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post.as_str(), target)
    }

    /// Creates a PUT request.
    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::Put.as_str(), target)
    }

    /// Creates a DELETE request.
    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::Delete.as_str(), target)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.header("Content-Type", "application/json")
            .body(value.to_string())
    }

    /// Returns the path component of the target.
    ///
    /// The scheme and authority of an absolute URL are dropped, as are the
    /// query and fragment. An empty path is reported as `/`.
    pub fn path(&self) -> &str {
        let (before_query, _) = self.split_target();
        if before_query.is_empty() {
            "/"
        } else {
            before_query
        }
    }

    /// Returns the raw query string, without the leading `?`.
    pub fn query_string(&self) -> &str {
        self.split_target().1
    }

    /// Parses the query string.
    pub fn query(&self) -> QueryParams {
        QueryParams::parse(self.query_string())
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Splits the target into (path, query).
    fn split_target(&self) -> (&str, &str) {
        let mut rest = self.target.as_str();
        if let Some(hash) = rest.find('#') {
            rest = &rest[..hash];
        }
        if let Some((scheme, after_scheme)) = rest.split_once("://") {
            if !scheme.contains(['/', '?']) {
                // Skip the authority; the path starts at the next '/' or '?'.
                let start = after_scheme
                    .find(['/', '?'])
                    .unwrap_or(after_scheme.len());
                rest = &after_scheme[start..];
            }
        }
        match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(Method::from_str("GET"), Some(Method::Get));
        assert_eq!(Method::from_str("post"), Some(Method::Post));
        assert_eq!(Method::from_str("Trace"), Some(Method::Trace));
        assert_eq!(Method::from_str("CONNECT"), None);
    }

    #[test]
    fn test_method_matches_ignores_case() {
        assert!(Method::Get.matches("get"));
        assert!(Method::Patch.matches("PaTcH"));
        assert!(!Method::Get.matches("POST"));
    }

    #[test]
    fn test_path_params() {
        let mut params = PathParams::new();
        params.insert("id", "123");
        params.insert("name", "test");

        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.parse::<i64>("id"), Some(123));
        assert_eq!(params.get("missing"), None);
        assert!(params.require("missing").is_err());
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_query_params_multi_value() {
        let query = QueryParams::parse("tags=a&tags=b&name=John+Doe&city=New%20York");
        assert_eq!(query.get("tags"), Some("a"));
        assert_eq!(query.get_all("tags"), vec!["a", "b"]);
        assert_eq!(query.get("name"), Some("John Doe"));
        assert_eq!(query.get("city"), Some("New York"));
        assert!(query.get_all("missing").is_empty());
        assert!(!query.contains("missing"));
    }

    #[test]
    fn test_absolute_target() {
        let req = Request::get("https://example.com/pet/findByStatus?status=available#top");
        assert_eq!(req.path(), "/pet/findByStatus");
        assert_eq!(req.query_string(), "status=available");
        assert_eq!(req.query().get("status"), Some("available"));
    }

    #[test]
    fn test_origin_form_target() {
        let req = Request::get("/users?page=1");
        assert_eq!(req.path(), "/users");
        assert_eq!(req.query().get("page"), Some("1"));

        let req = Request::get("/redirect?to=https://example.com/x");
        assert_eq!(req.path(), "/redirect");
        assert_eq!(req.query().get("to"), Some("https://example.com/x"));
    }

    #[test]
    fn test_empty_paths() {
        assert_eq!(Request::get("https://example.com").path(), "/");
        assert_eq!(Request::get("https://example.com?x=1").path(), "/");
        assert_eq!(Request::get("https://example.com?x=1").query_string(), "x=1");
        assert_eq!(Request::get("").path(), "/");
    }

    #[test]
    fn test_request_builder() {
        let req = Request::post("/users")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"rex"}"#);

        assert_eq!(req.method, "POST");
        assert_eq!(req.get_header("content-type"), Some("application/json"));
        let body: serde_json::Value = req.json().unwrap();
        assert_eq!(body["name"], "rex");
    }
}
