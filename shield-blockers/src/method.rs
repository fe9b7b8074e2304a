use shield::{Block, HttpRequest};

/// Blocks requests whose method is not in a list of allowed methods.
///
/// Configured methods are compared in upper case, so `"get"` allows `GET`.
/// The request method is compared as sent.
#[derive(Clone, Debug, Default)]
pub struct Method {
    allow_methods: Vec<String>,
}

impl Method {
    pub fn new<T>(allow_methods: T) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            allow_methods: allow_methods
                .into_iter()
                .map(|m| m.as_ref().to_uppercase())
                .collect(),
        }
    }
}

impl Block for Method {
    fn block(&self, request: &HttpRequest) -> bool {
        let method = request.method().as_str();
        !self.allow_methods.iter().any(|m| m == method)
    }
}
