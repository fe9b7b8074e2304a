use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use std::convert::TryInto;
use std::sync::Arc;

use crate::middleware::{Middleware, ToMiddleware};
use crate::response::{parse_status, BlockingResponse, ResponseError};
use crate::{Block, HttpResponse, RequestContext, Status};

/// Shield Middleware configuration
///
/// Holds the predicate and the response issued when it returns `true`.
/// Wrapping the configuration around the next middleware (see
/// [`ToMiddleware`]) yields the [`Shield`] itself; the configuration is never
/// changed after that.
///
/// The builder methods panic on input that can't be converted into a status
/// code, header name or header value. They are meant to run once, while the
/// server is being wired up.
#[derive(Clone)]
pub struct ShieldConfiguration {
    block: Arc<dyn Block>,
    response: BlockingResponse,
}

impl ShieldConfiguration {
    pub fn new<T, B>(code: T, block: B) -> Self
    where
        T: TryInto<Status>,
        B: Block,
    {
        Self {
            block: Arc::new(block),
            response: BlockingResponse::new(parse_status(code)),
        }
    }

    pub fn code<T>(mut self, code: T) -> Self
    where
        T: TryInto<Status>,
    {
        self.response.set_code(parse_status(code));
        self
    }

    /// Add a value to the response header `name`. Repeated calls with the same
    /// name add further values, kept in call order.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        let name = match name.try_into() {
            Ok(name) => name,
            Err(_) => panic!("Failed to parse input as http header name"),
        };
        let value = match value.try_into() {
            Ok(value) => value,
            Err(_) => panic!("Failed to parse input as http header value"),
        };
        self.response.add_header(name, value);
        self
    }

    /// Add every value of a header name → values mapping
    pub fn headers<T, K, I, V>(mut self, headers: T) -> Self
    where
        T: IntoIterator<Item = (K, I)>,
        K: TryInto<HeaderName>,
        I: IntoIterator<Item = V>,
        V: TryInto<HeaderValue>,
    {
        for (name, values) in headers {
            let name: HeaderName = match name.try_into() {
                Ok(name) => name,
                Err(_) => panic!("Failed to parse input as http header name"),
            };
            for value in values {
                self = self.header(name.clone(), value);
            }
        }
        self
    }

    pub fn body<T>(mut self, body: T) -> Self
    where
        T: Into<Bytes>,
    {
        self.response.set_body(body.into());
        self
    }

    /// Plain text body, with `Content-Type: text/plain`.
    ///
    /// The content type replaces any `Content-Type` values added before this
    /// call. A `header("content-type", ..)` added afterwards is appended next
    /// to it, so set a custom content type with `body` and `header` instead.
    pub fn text<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.response.set_text(text.into());
        self
    }

    /// JSON body, with `Content-Type: application/json`.
    ///
    /// Order matters the same way as for [`text`](Self::text).
    pub fn json<T>(mut self, body: &T) -> Result<Self, ResponseError>
    where
        T: serde::Serialize,
    {
        self.response.set_json(body)?;
        Ok(self)
    }

    pub fn response(&self) -> &BlockingResponse {
        &self.response
    }
}

impl std::fmt::Debug for ShieldConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShieldConfiguration")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

/// Middleware that blocks requests matching a predicate
///
/// For every request the predicate runs first. When it returns `true` the
/// configured [`BlockingResponse`] is issued and the next middleware is never
/// called. Otherwise the request is passed on untouched and whatever the next
/// middleware returns goes out unchanged.
pub struct Shield<GlobalCtx, LocalCtx> {
    config: ShieldConfiguration,
    next: Arc<dyn Middleware<GlobalCtx, LocalCtx>>,
}

impl<G, L> ToMiddleware<G, L> for ShieldConfiguration
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static,
{
    fn wrap(self, next: Arc<dyn Middleware<G, L>>) -> Arc<dyn Middleware<G, L>> {
        Arc::new(Shield { config: self, next })
    }
}

#[async_trait]
impl<GlobalCtx, LocalCtx> Middleware<GlobalCtx, LocalCtx> for Shield<GlobalCtx, LocalCtx>
where
    GlobalCtx: Send + Sync + 'static,
    LocalCtx: Send + Sync + 'static,
{
    async fn call(&self, context: &mut RequestContext<GlobalCtx, LocalCtx>) -> HttpResponse {
        if self.config.block.block(&context.request) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = context.request.method().as_str(),
                path = context.request.uri().path(),
                status = self.config.response.code().as_u16(),
                "Request blocked by shield"
            );

            return self.config.response.to_http();
        }

        self.next.call(context).await
    }
}
