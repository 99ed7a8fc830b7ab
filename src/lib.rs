//! # rum
//!
//! **rum** is a small HTTP router built around a compressed prefix tree (radix
//! tree). Request paths are matched in time proportional to their length, not
//! to the number of registered routes, and named path parameters are captured
//! into a reusable stack-allocated buffer.
//!
//! ## Architecture
//!
//! - **[`router`]** - Per-method radix trees, pattern syntax, conflict detection
//! - **[`context`]** - Per-request context and handler chain execution
//! - **[`group`]** - Route groups sharing a path prefix and middleware
//! - **[`engine`]** - Route table of handler chains and the request entry point
//! - **[`server`]** - HTTP/1.1 server on `may_minihttp` coroutines
//! - **[`middleware`]** - Built-in middleware (request logging)
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven process setup
//!
//! ## Pattern Syntax
//!
//! | Pattern             | Matches                  | Captures                   |
//! |---------------------|--------------------------|----------------------------|
//! | `/users/list`       | exactly `/users/list`    | nothing                    |
//! | `/users/:id`        | `/users/42`              | `id = "42"`                |
//! | `/static/*filepath` | `/static/css/a.css`      | `filepath = "css/a.css"`   |
//!
//! Static segments take precedence over parameters, parameters over catch-alls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use rum::{handler_fn, middleware, Engine, Routes};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut engine = Engine::new();
//!     engine.use_middleware(middleware::logger());
//!     engine.get("/users/:id", vec![handler_fn(|c| {
//!         let id = c.param("id").unwrap_or_default().to_owned();
//!         c.string(StatusCode::OK, format!("user {}\n", id));
//!     })])?;
//!
//!     engine.run("127.0.0.1:9678")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Middleware
//!
//! A middleware is an ordinary handler that calls [`Context::next`] to run the
//! rest of the chain, or [`Context::abort`] to stop it:
//!
//! ```rust
//! use rum::{handler_fn, Context};
//!
//! let auth = handler_fn(|c: &mut Context| {
//!     if c.header("authorization").is_none() {
//!         c.string(http::StatusCode::UNAUTHORIZED, "missing credentials\n");
//!         c.abort();
//!     }
//! });
//! # let _ = auth;
//! ```

pub mod cli;
pub mod context;
pub mod engine;
pub mod group;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{handler_fn, Binding, Context, HandlerFunc, HandlersChain};
pub use engine::{Engine, RouteInfo};
pub use group::{RouterGroup, Routes};
pub use router::{Param, Params, RouteError, Router};
