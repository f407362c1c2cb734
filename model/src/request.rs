//! Per-request context passed to request-bound accessors and generators.

/// The inbound request a bootstrap page is rendered for.
///
/// Header names are matched case-insensitively; the first header with a
/// matching name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    path: String,
    headers: Vec<(String, String)>,
}

impl RequestContext {
    /// Creates a context for the given request path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: Vec::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers in arrival order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = RequestContext::new("/").with_header("User-Agent", "Mobile Safari");
        assert_eq!(request.header("user-agent"), Some("Mobile Safari"));
        assert_eq!(request.header("USER-AGENT"), Some("Mobile Safari"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn first_header_wins() {
        let request = RequestContext::default()
            .with_header("X-Test", "one")
            .with_header("x-test", "two");
        assert_eq!(request.header("X-Test"), Some("one"));
        assert_eq!(request.headers().count(), 2);
    }
}
