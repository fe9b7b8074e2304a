mod service;

use std::sync::Arc;

use crate::middleware::{Middleware, ToMiddleware};

/// # Shield Server
///
/// Binds a hyper server to a middleware chain. The shield doesn't need it,
/// any hyper service can drive a chain, but it saves the boilerplate for small
/// deployments and tests.
///
/// ## Middleware Call Order
///
/// The chain is built from the endpoint outwards: every call to `.with()`
/// wraps everything added before it, so the last middleware added sees the
/// request first.
///
/// ```ignore
/// let server = Server::new()
///     .context(())
///     .endpoint(app)
///     .with(scheme_shield)
///     .with(method_shield);
/// ```
///
/// Here `method_shield` runs first. A request it blocks never reaches
/// `scheme_shield` or `app`.
pub struct Server<GlobalCtx, LocalCtx>
where
    GlobalCtx: 'static,
    LocalCtx: 'static,
{
    context: Option<Arc<GlobalCtx>>,
    middleware_stack: Option<Arc<dyn Middleware<GlobalCtx, LocalCtx>>>,
}

#[derive(Debug)]
pub enum ServerError {
    Hyper(hyper::Error),

    NoContext,
    NoEndpoint,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Hyper(ref e) => write!(f, "Server failed: {}", e),
            ServerError::NoContext => write!(f, "No global context was given to the server"),
            ServerError::NoEndpoint => write!(f, "No endpoint was given to the server"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Hyper(ref e) => Some(e),
            _ => None,
        }
    }
}

impl<G, L> Default for Server<G, L>
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            context: None,
            middleware_stack: None,
        }
    }
}

impl<G, L> Server<G, L>
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the server a context object to use
    pub fn context(mut self, ctx: G) -> Self {
        self.context = Some(Arc::new(ctx));
        self
    }

    /// Set the innermost link of the chain
    pub fn endpoint<M>(mut self, endpoint: M) -> Self
    where
        M: Into<Arc<dyn Middleware<G, L>>>,
    {
        self.middleware_stack = Some(endpoint.into());
        self
    }

    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: ToMiddleware<G, L> + 'static,
    {
        if let Some(stack) = self.middleware_stack {
            self.middleware_stack = Some(middleware.wrap(stack));
            self
        } else {
            panic!("Endpoint must be set before middleware")
        }
    }

    pub async fn listen<T>(self, addr: T) -> Result<(), ServerError>
    where
        T: Into<std::net::SocketAddr>,
    {
        let addr: std::net::SocketAddr = addr.into();

        if let Some(stack) = self.middleware_stack {
            let context = self.context.ok_or(ServerError::NoContext)?;

            #[cfg(feature = "tracing")]
            tracing::info!(%addr, "Listening");

            service::serve(&addr, context, stack)
                .await
                .map_err(ServerError::Hyper)
        } else {
            Err(ServerError::NoEndpoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[tokio::test]
    async fn listen_without_endpoint_fails() {
        let server: Server<(), ()> = Server::new().context(());
        let result = server.listen(([127, 0, 0, 1], 0)).await;
        assert!(matches!(result, Err(ServerError::NoEndpoint)));
    }

    #[tokio::test]
    async fn listen_without_context_fails() {
        let server: Server<(), ()> = Server::new()
            .endpoint(closure(|_: &mut RequestContext<(), ()>| async {
                HttpResponse::new(HttpBody::empty())
            }));
        let result = server.listen(([127, 0, 0, 1], 0)).await;
        assert!(matches!(result, Err(ServerError::NoContext)));
    }

    #[test]
    #[should_panic(expected = "Endpoint must be set")]
    fn middleware_needs_an_endpoint() {
        let _: Server<(), ()> = Server::new()
            .context(())
            .with(ShieldConfiguration::new(Status::FORBIDDEN, |_: &HttpRequest| true));
    }

    #[cfg(feature = "network-tests")]
    #[tokio::test]
    async fn server_applies_shield() {
        use std::time::Duration;

        let app = closure(|_: &mut RequestContext<(), ()>| async {
            hyper::Response::builder()
                .header("x-next", "v")
                .body(HttpBody::from("next"))
                .unwrap()
        });
        let shield = ShieldConfiguration::new(Status::METHOD_NOT_ALLOWED, |r: &HttpRequest| {
            r.method() != Method::GET
        })
        .header("content-type", "text/plain")
        .header("h", "a")
        .header("h", "b")
        .body("blocked");

        let server = Server::new().context(()).endpoint(app).with(shield);

        let _server_handle = tokio::spawn(async move {
            server
                .listen(([127, 0, 0, 1], 4300))
                .await
                .expect("Server failed")
        });

        // Wait until server starts
        tokio::time::sleep(Duration::from_secs(1)).await;

        let client = reqwest::Client::new();

        let allowed = client
            .get("http://localhost:4300/")
            .send()
            .await
            .expect("Failed to GET from server");
        assert_eq!(allowed.status().as_u16(), 200);
        assert_eq!(allowed.headers()["x-next"], "v");
        assert!(allowed.headers().get("h").is_none());
        assert_eq!(allowed.text().await.unwrap(), "next");

        let blocked = client
            .put("http://localhost:4300/")
            .send()
            .await
            .expect("Failed to PUT to server");
        assert_eq!(blocked.status().as_u16(), 405);
        assert_eq!(blocked.headers()["content-type"], "text/plain");
        let values: Vec<_> = blocked.headers().get_all("h").iter().collect();
        assert_eq!(values, vec!["a", "b"]);
        assert!(blocked.headers().get("x-next").is_none());
        assert_eq!(blocked.text().await.unwrap(), "blocked");
    }
}
