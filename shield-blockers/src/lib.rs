#![forbid(unsafe_code)]

//! Predefined predicates for the shield middleware.
//!
//! Each one is an allow-list: a request matching the configuration is let
//! through, anything else is blocked. An empty configuration blocks every
//! request.

mod method;
mod query;
mod scheme;

pub use method::Method;
pub use query::{Query, QueryError};
pub use scheme::Scheme;
