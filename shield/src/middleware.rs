use std::future::Future;
use std::sync::Arc;

use crate::{HttpResponse, RequestContext};

/// # Middleware
///
/// One link in the request handling chain. A middleware either produces the
/// response itself or awaits the next link it was wrapped around. The last
/// link of every chain is an endpoint, usually a closure (see [`closure`]).
#[async_trait]
pub trait Middleware<GlobalCtx, LocalCtx>
where
    Self: Send + Sync + 'static,
    GlobalCtx: Send + Sync + 'static,
    LocalCtx: Send + Sync + 'static,
{
    async fn call(&self, context: &mut RequestContext<GlobalCtx, LocalCtx>) -> HttpResponse;
}

/// Configuration that turns into a [`Middleware`] once it knows what comes
/// next in the chain.
pub trait ToMiddleware<GlobalCtx, LocalCtx> {
    fn wrap(
        self,
        next: Arc<dyn Middleware<GlobalCtx, LocalCtx>>,
    ) -> Arc<dyn Middleware<GlobalCtx, LocalCtx>>;
}

#[async_trait]
impl<G, L, F, Fut> Middleware<G, L> for F
where
    G: Send + Sync + 'static,
    L: Send + Sync + 'static,
    F: Fn(&mut RequestContext<G, L>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    async fn call(&self, context: &mut RequestContext<G, L>) -> HttpResponse {
        (self)(context).await
    }
}

/// Create a shareable chain link from any type that implements [`Middleware`]
pub fn wrapped<GlobalCtx, LocalCtx, M>(middleware: M) -> Arc<dyn Middleware<GlobalCtx, LocalCtx>>
where
    GlobalCtx: Send + Sync + 'static,
    LocalCtx: Send + Sync + 'static,
    M: Middleware<GlobalCtx, LocalCtx>,
{
    Arc::new(middleware)
}

/// Create an endpoint from a closure.
///
/// Note: `wrapped` can take closures too, but then the context argument
/// (`&mut RequestContext<GlobalCtx, LocalCtx>`) must be type hinted. This
/// function carries the same bounds as the closure impl so the hint can be
/// left out.
pub fn closure<GlobalCtx, LocalCtx, F, Fut>(endpoint: F) -> Arc<dyn Middleware<GlobalCtx, LocalCtx>>
where
    GlobalCtx: Send + Sync + 'static,
    LocalCtx: Send + Sync + 'static,
    F: Fn(&mut RequestContext<GlobalCtx, LocalCtx>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    wrapped(endpoint)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;

    struct Teapot;
    #[async_trait]
    impl Middleware<(), ()> for Teapot {
        async fn call(&self, _: &mut RequestContext<(), ()>) -> HttpResponse {
            let mut resp = HttpResponse::new(HttpBody::empty());
            *resp.status_mut() = Status::IM_A_TEAPOT;
            resp
        }
    }

    /// Stamps a header on whatever the next link returns
    struct Stamp {
        next: Arc<dyn Middleware<(), ()>>,
    }
    #[async_trait]
    impl Middleware<(), ()> for Stamp {
        async fn call(&self, context: &mut RequestContext<(), ()>) -> HttpResponse {
            let mut resp = self.next.call(context).await;
            resp.headers_mut()
                .insert("x-stamp", hyper::header::HeaderValue::from_static("1"));
            resp
        }
    }

    struct StampConfiguration;
    impl ToMiddleware<(), ()> for StampConfiguration {
        fn wrap(self, next: Arc<dyn Middleware<(), ()>>) -> Arc<dyn Middleware<(), ()>> {
            Arc::new(Stamp { next })
        }
    }

    fn context() -> RequestContext<(), ()> {
        RequestContext::new(Arc::new(()), (), HttpRequest::new(HttpBody::empty()))
    }

    #[tokio::test]
    async fn endpoint_wrapping_works() {
        let endpoints: Vec<Arc<dyn Middleware<(), ()>>> = vec![
            super::wrapped(Teapot),
            super::wrapped(|_: &mut RequestContext<(), ()>| async {
                let mut resp = HttpResponse::new(HttpBody::empty());
                *resp.status_mut() = Status::IM_A_TEAPOT;
                resp
            }),
            super::closure(|_| async {
                let mut resp = HttpResponse::new(HttpBody::empty());
                *resp.status_mut() = Status::IM_A_TEAPOT;
                resp
            }),
        ];

        for e in endpoints {
            let resp = e.call(&mut context()).await;
            assert_eq!(resp.status(), Status::IM_A_TEAPOT);
        }
    }

    #[tokio::test]
    async fn wrapping_forms_a_chain() {
        let chain = StampConfiguration.wrap(super::wrapped(Teapot));
        let resp = chain.call(&mut context()).await;

        assert_eq!(resp.status(), Status::IM_A_TEAPOT);
        assert_eq!(resp.headers()["x-stamp"], "1");
    }
}
