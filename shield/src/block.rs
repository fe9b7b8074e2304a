use std::sync::Arc;

use crate::HttpRequest;

/// # Block
///
/// A predicate deciding whether a request is refused. Returning `true` means
/// "block this request", `false` lets it through to the next middleware.
///
/// Implementations must be pure: the same request always yields the same
/// answer, and neither the request nor the predicate's configuration is
/// modified. Predicates are shared by every request the server handles
/// concurrently, hence the `Send + Sync` bound.
///
/// Any `Fn(&HttpRequest) -> bool` closure is a `Block`, which is also how
/// predicates are combined:
///
/// ```ignore
/// let methods = shield_blockers::Method::new(["GET", "POST"]);
/// let schemes = shield_blockers::Scheme::new(["https"]);
/// let either = move |r: &HttpRequest| methods.block(r) || schemes.block(r);
/// ```
///
/// To choose a predicate at runtime, erase its type behind `Arc<dyn Block>`,
/// which is a `Block` itself. `Box<dyn Block>` is not: `Box<F>` is already a
/// closure whenever `F` is one, so the two impls would overlap.
pub trait Block: Send + Sync + 'static {
    fn block(&self, request: &HttpRequest) -> bool;
}

impl<F> Block for F
where
    F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
{
    fn block(&self, request: &HttpRequest) -> bool {
        (self)(request)
    }
}

impl<B: Block + ?Sized> Block for Arc<B> {
    fn block(&self, request: &HttpRequest) -> bool {
        (**self).block(request)
    }
}
