//! # Router Module
//!
//! The router module provides path matching and route resolution for rum. It
//! maps an HTTP method and request path to a registered value (for the engine,
//! a handler chain) and captures named path parameters along the way.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building one radix tree per HTTP method from route patterns
//! - Detecting malformed and conflicting patterns at registration time
//! - Matching incoming request paths in time proportional to the path length
//! - Capturing `:name` and `*name` parameters into a caller-owned buffer
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: at startup, patterns such as `/users/:id` are inserted
//!    into the tree for their method. Shared prefixes are merged and nodes are
//!    split as needed. Errors are returned as [`RouteError`].
//!
//! 2. **Matching**: for each request the tree is walked byte by byte from the
//!    root. Static children win over the wildcard child at each branch point.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use rum::router::{Params, Router};
//!
//! # fn main() -> Result<(), rum::RouteError> {
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/static/*filepath", "assets")?;
//! router.add_route(Method::GET, "/users/:id", "user")?;
//!
//! let mut params = Params::new();
//! let found = router.resolve(&Method::GET, "/static/css/site.css", &mut params);
//! assert_eq!(found, Some(&"assets"));
//! assert_eq!(params.get("filepath"), Some("css/site.css"));
//! # Ok(())
//! # }
//! ```

mod core;
mod error;
mod params;
mod path;
mod tree;
#[cfg(test)]
mod tests;

pub use core::{RouteEntry, Router};
pub use error::RouteError;
pub use params::{Param, Params, MAX_INLINE_PARAMS};
pub use path::{filter_flags, join_paths};
pub use tree::{Node, NodeKind};
