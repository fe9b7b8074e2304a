use std::sync::Arc;

use super::HttpRequest;

/// # Request Context
///
/// The `RequestContext` struct represents the lifetime of a request as it
/// travels down the middleware chain. A mutable reference to it is handed to
/// each middleware in turn and finally to the endpoint.
///
/// ## Global Context
///
/// The `global` field references some context held by the server for its
/// whole lifetime (connection pools, shared caches). It is read only.
/// When nothing is needed, use the empty tuple type `()`.
///
/// ## Local Context
///
/// The `local` field holds data specific to the current request. Types used
/// as local context must implement [`Default`] when served through
/// [`Server`](crate::Server), which instantiates it for every new request.
///
/// ## Request
///
/// The request itself. The shield and the predicates only ever read it, so a
/// request that is let through reaches the next middleware exactly as it
/// arrived.
pub struct RequestContext<GlobalCtx, LocalCtx> {
    pub global: Arc<GlobalCtx>,
    pub local: LocalCtx,
    pub request: HttpRequest,
}

impl<G, L> RequestContext<G, L> {
    pub fn new(global: Arc<G>, local: L, request: HttpRequest) -> Self {
        Self {
            global,
            local,
            request,
        }
    }
}

impl<G, L: Default> RequestContext<G, L> {
    /// Context for a request with a fresh, default local context
    pub fn with_default_local(global: Arc<G>, request: HttpRequest) -> Self {
        Self::new(global, L::default(), request)
    }
}
