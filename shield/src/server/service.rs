use hyper::service::{make_service_fn, service_fn};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

#[cfg(all(feature = "tracing", feature = "tracing-futures"))]
use tracing_futures::Instrument;

use crate::{HttpRequest, HttpResponse, Middleware, RequestContext};

/// Serve `call_stack` on `addr` until the server fails. Every connection
/// shares the same chain and global context.
pub(super) async fn serve<G, L>(
    addr: &SocketAddr,
    context: Arc<G>,
    call_stack: Arc<dyn Middleware<G, L>>,
) -> Result<(), hyper::Error>
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static + Default,
{
    let make_service = make_service_fn(move |_| {
        let context = context.clone();
        let call_stack = call_stack.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                handle(context.clone(), call_stack.clone(), req)
            }))
        }
    });

    hyper::Server::try_bind(addr)?.serve(make_service).await
}

/// Run one request through the chain. A chain always produces a response, so
/// this can't fail.
async fn handle<G, L>(
    context: Arc<G>,
    call_stack: Arc<dyn Middleware<G, L>>,
    req: HttpRequest,
) -> Result<HttpResponse, Infallible>
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static + Default,
{
    #[cfg(all(feature = "tracing", feature = "tracing-futures"))]
    let span = tracing::debug_span!(
        "request",
        method = req.method().as_str(),
        path = req.uri().path()
    );

    let mut context = RequestContext::with_default_local(context, req);
    let response = async move { call_stack.call(&mut context).await };

    #[cfg(all(feature = "tracing", feature = "tracing-futures"))]
    let response = response.instrument(span);

    Ok(response.await)
}
