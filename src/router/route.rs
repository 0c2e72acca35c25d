use url::form_urlencoded;
use url::Url;

/// A browser location split into its path and ordered query pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Route {
    /// Parse `"/path?query#fragment"` or an absolute URL. The fragment is dropped.
    pub fn parse(location: &str) -> Self {
        if let Ok(url) = Url::parse(location) {
            if url.has_host() {
                return Self {
                    path: url.path().to_string(),
                    query: url.query_pairs().into_owned().collect(),
                };
            }
        }

        let location = location.split('#').next().unwrap_or_default();
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// `path` (which may carry its own query) plus `params`, each appended;
    /// a repeated key becomes a repeated parameter.
    pub fn with_params(path: &str, params: &[(&str, &str)]) -> Self {
        let mut route = Self::parse(path);
        route
            .query
            .extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        route
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every value of `key` with a single `value`, keeping the
    /// position of the first occurrence.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.query.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.query[first].1 = value.to_string();
                let mut index = 0;
                self.query.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.query.push((key.to_string(), value.to_string())),
        }
    }

    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}
