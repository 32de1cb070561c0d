use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

/// Query parameter holding the 1-based listing page.
pub const PAGE_PARAM: &str = "page";
/// Query parameter holding the display mode.
pub const THEME_PARAM: &str = "theme";

/// How a navigation treats the query parameters of the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryHandling {
    /// Keep current parameters, overriding the ones supplied.
    Merge,
    /// Drop current parameters, keep only the ones supplied.
    Replace,
}

/// Navigable location: path segments plus query parameters.
///
/// Formats as `blog/learn/variables?page=2&theme=dark`. Query keys are kept
/// sorted so equal locations always format identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<String>,
    query: BTreeMap<String, String>,
}

impl Location {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
            query: BTreeMap::new(),
        }
    }

    /// Parse `path?query`. Leading `/` or `#/`, empty segments, and empty
    /// query keys are ignored; later duplicate keys win.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input.strip_prefix('#').unwrap_or(input);
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, query),
            None => (input, ""),
        };

        let mut location = Self::new(path.split('/').map(str::trim));
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if !key.is_empty() {
                location.query.insert(key.into_owned(), value.into_owned());
            }
        }
        location
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path portion without leading slash (`blog/learn`).
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn same_path(&self, other: &Location) -> bool {
        self.segments == other.segments
    }

    pub fn same_query(&self, other: &Location) -> bool {
        self.query == other.query
    }

    /// Copy with `updates` applied to the query. `None` removes the key.
    pub fn with_query(&self, updates: &[(&str, Option<&str>)], handling: QueryHandling) -> Self {
        let mut next = self.clone();
        if handling == QueryHandling::Replace {
            next.query.clear();
        }
        for (key, value) in updates {
            match value {
                Some(value) => {
                    next.query.insert((*key).to_string(), (*value).to_string());
                }
                None => {
                    next.query.remove(*key);
                }
            }
        }
        next
    }

    /// Copy pointing at `segments`, with the query handled per `handling`.
    pub fn with_path<S: Into<String>>(
        &self,
        segments: impl IntoIterator<Item = S>,
        updates: &[(&str, Option<&str>)],
        handling: QueryHandling,
    ) -> Self {
        let mut next = Location::new(segments);
        next.query = self.query.clone();
        next.with_query(updates, handling)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
