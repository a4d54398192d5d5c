//! Query-string lookup.
//!
//! Values are returned exactly as they appear: no percent-decoding and no
//! `+` to space. Only the first occurrence of a key is visible.

/// A borrowed query string (the part of a URL after `?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryString<'a> {
    raw: &'a str,
}

impl<'a> QueryString<'a> {
    /// Wrap a raw query. A single leading `?` is tolerated.
    pub fn new(query: &'a str) -> Self {
        Self {
            raw: query.strip_prefix('?').unwrap_or(query),
        }
    }

    /// Extract the query from a full URL: the fragment is dropped, then
    /// everything after the first `?` is kept. A URL without `?` has an
    /// empty query.
    pub fn from_url(url: &'a str) -> Self {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let raw = without_fragment.split_once('?').map_or("", |(_, query)| query);
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Key/value pairs in order of appearance. Each `&`-separated segment is
    /// split on its first `=`. A segment without `=` has an empty value, so a
    /// bare key such as `?debug` reads as present (`Some("")`), not absent.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let raw = self.raw;
        raw.split('&')
            .filter(move |_| !raw.is_empty())
            .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
    }

    /// Value of the first pair whose key equals `name` exactly.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.pairs().find(|(key, _)| *key == name).map(|(_, value)| value)
    }
}

/// Look up `name` in the query string of `url`.
///
/// `None` means the key is absent.
pub fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    QueryString::from_url(url).get(name)
}
