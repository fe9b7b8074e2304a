use regex::Regex;
use std::collections::BTreeMap;

use shield::{Block, HttpRequest};

/// Blocks requests whose query parameters don't match a set of patterns.
///
/// Every configured parameter name is paired with a regular expression. A
/// request is let through only when, for each pair, the pattern finds a match
/// somewhere in the first value of that parameter. Patterns are not anchored;
/// use `^...$` for a full match.
///
/// A parameter missing from the request is matched as the empty string, so an
/// optional parameter is written as `^$|...`. Further values of a repeated
/// parameter and parameters that aren't configured are ignored.
///
/// Patterns are compiled once, when the blocker is created.
#[derive(Clone, Debug, Default)]
pub struct Query {
    // `None` marks a pattern that failed to compile
    qparams: BTreeMap<String, Option<Regex>>,
}

impl Query {
    /// Create a blocker from parameter name → pattern pairs.
    ///
    /// A pattern that isn't a valid regular expression never matches, so any
    /// blocker holding one blocks every request. Use [`Query::try_new`] to get
    /// the error instead.
    pub fn new<T, K, V>(qparams: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let qparams = qparams
            .into_iter()
            .map(|(name, pattern)| {
                let name = name.into();
                let regex = match Regex::new(pattern.as_ref()) {
                    Ok(regex) => Some(regex),
                    Err(_e) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            param = name.as_str(),
                            error = %_e,
                            "Invalid query pattern, every request will be blocked"
                        );
                        None
                    }
                };
                (name, regex)
            })
            .collect();

        Self { qparams }
    }

    /// Create a blocker from parameter name → pattern pairs, failing on the
    /// first pattern that isn't a valid regular expression.
    pub fn try_new<T, K, V>(qparams: T) -> Result<Self, QueryError>
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut compiled = BTreeMap::new();
        for (name, pattern) in qparams {
            let name = name.into();
            match Regex::new(pattern.as_ref()) {
                Ok(regex) => {
                    compiled.insert(name, Some(regex));
                }
                Err(source) => return Err(QueryError { name, source }),
            }
        }

        Ok(Self { qparams: compiled })
    }
}

impl Block for Query {
    fn block(&self, request: &HttpRequest) -> bool {
        if self.qparams.is_empty() {
            return true;
        }

        let pairs = query_pairs(request);
        for (name, regex) in &self.qparams {
            let value = pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default();

            match regex {
                Some(regex) if regex.is_match(value) => {}
                _ => return true,
            }
        }

        false
    }
}

/// The decoded query string of a request, in order of appearance
fn query_pairs(request: &HttpRequest) -> Vec<(String, String)> {
    let raw_query = request.uri().query().unwrap_or_default();
    match serde_urlencoded::from_str(raw_query) {
        Ok(pairs) => pairs,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "Failed to decode query string");
            Vec::new()
        }
    }
}

#[derive(Debug)]
pub struct QueryError {
    pub name: String,
    pub source: regex::Error,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid pattern for query parameter `{}`: {}",
            self.name, self.source
        )
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
