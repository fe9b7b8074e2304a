use shield::{Block, HttpRequest};

/// Blocks requests whose URL scheme is not in a list of allowed schemes.
///
/// Configured schemes are compared in lower case, so `"HTTPS"` allows
/// `https`. The request scheme is compared as hyper presents it. Requests in
/// origin form (`GET /path`) carry no scheme and are compared as `""`.
#[derive(Clone, Debug, Default)]
pub struct Scheme {
    allow_schemes: Vec<String>,
}

impl Scheme {
    pub fn new<T>(allow_schemes: T) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            allow_schemes: allow_schemes
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Block for Scheme {
    fn block(&self, request: &HttpRequest) -> bool {
        let scheme = request.uri().scheme_str().unwrap_or_default();
        !self.allow_schemes.iter().any(|s| s == scheme)
    }
}
