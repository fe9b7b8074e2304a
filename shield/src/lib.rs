#![forbid(unsafe_code)]

//! # Shield
//!
//! A middleware that inspects each incoming request with a predicate and
//! either answers it with a fixed blocking response or hands it, untouched, to
//! the next middleware in the chain.
//!
//! ```ignore
//! use shield::prelude::*;
//!
//! let shield = ShieldConfiguration::new(Status::METHOD_NOT_ALLOWED, |r: &HttpRequest| {
//!     r.method() != Method::GET
//! })
//! .header("content-type", "text/plain")
//! .body("Method Not Allowed");
//!
//! let hello = closure(|_: &mut RequestContext<(), ()>| async {
//!     HttpResponse::new(HttpBody::from("hello world"))
//! });
//!
//! Server::new()
//!     .context(())
//!     .endpoint(hello)
//!     .with(shield)
//!     .listen(([127, 0, 0, 1], 8080))
//!     .await?;
//! ```
//!
//! Reusable predicates live in the `shield-blockers` crate.

#[macro_use]
extern crate async_trait;

mod block;
pub mod context;
pub mod middleware;
pub mod response;
mod server;
mod shield;

pub mod prelude {

    // Re-export hyper so consumers don't need to include it explicitly
    pub use hyper;
    pub type HttpResponse = hyper::Response<hyper::Body>;
    pub type HttpRequest = hyper::Request<hyper::Body>;
    pub type HttpBody = hyper::Body;
    pub type Method = hyper::Method;
    pub type Status = hyper::StatusCode;

    pub use super::block::Block;
    pub use super::context::RequestContext;
    pub use super::middleware::{closure, wrapped, Middleware, ToMiddleware};
    pub use super::response::{BlockingResponse, ResponseError};
    pub use super::server::{Server, ServerError};
    pub use super::shield::{Shield, ShieldConfiguration};
}

pub use prelude::*;
