//! Route groups: a shared path prefix plus shared handlers.

use http::Method;

use crate::context::HandlerFunc;
use crate::engine::Engine;
use crate::router::{join_paths, RouteError};

/// Route registration surface shared by [`Engine`] and [`RouterGroup`]
///
/// Every method returns `&mut Self` on success so registrations chain with `?`:
///
/// ```rust
/// use rum::{handler_fn, Engine, Routes};
///
/// # fn main() -> Result<(), rum::RouteError> {
/// let mut engine = Engine::new();
/// engine
///     .get("/ping", vec![handler_fn(|c| c.string(http::StatusCode::OK, "pong"))])?
///     .post("/echo", vec![handler_fn(|c| {
///         let body = c.request().body.clone();
///         c.data(http::StatusCode::OK, body)
///     })])?;
/// # Ok(())
/// # }
/// ```
pub trait Routes {
    /// Append middleware that runs before the handlers of routes registered afterwards
    fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self;

    /// Register `handlers` for `method` at `relative_path` below this router's base path
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] from route registration.
    fn handle(
        &mut self,
        method: Method,
        relative_path: &str,
        handlers: Vec<HandlerFunc>,
    ) -> Result<&mut Self, RouteError>;

    fn get(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::GET, path, handlers)
    }

    fn post(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::POST, path, handlers)
    }

    fn put(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::PUT, path, handlers)
    }

    fn delete(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::DELETE, path, handlers)
    }

    fn patch(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::PATCH, path, handlers)
    }

    fn head(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::HEAD, path, handlers)
    }

    fn options(&mut self, path: &str, handlers: Vec<HandlerFunc>) -> Result<&mut Self, RouteError> {
        self.handle(Method::OPTIONS, path, handlers)
    }
}

/// Group handlers followed by route handlers
pub(crate) fn combine(group: &[HandlerFunc], handlers: Vec<HandlerFunc>) -> Vec<HandlerFunc> {
    let mut merged = Vec::with_capacity(group.len() + handlers.len());
    merged.extend(group.iter().cloned());
    merged.extend(handlers);
    merged
}

/// A set of routes sharing a path prefix and leading handlers
///
/// The group borrows the engine mutably for as long as it is used; nested
/// groups reborrow it. Handlers are copied into each route at registration
/// time, so middleware added to a group later does not reach routes it
/// already registered.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    base_path: String,
    handlers: Vec<HandlerFunc>,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, base_path: String, handlers: Vec<HandlerFunc>) -> Self {
        Self {
            engine,
            base_path,
            handlers,
        }
    }

    /// Create a nested group below this one
    pub fn group(&mut self, relative_path: &str, handlers: Vec<HandlerFunc>) -> RouterGroup<'_> {
        RouterGroup {
            base_path: join_paths(&self.base_path, relative_path),
            handlers: combine(&self.handlers, handlers),
            engine: &mut *self.engine,
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn handlers(&self) -> &[HandlerFunc] {
        &self.handlers
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &*self.engine
    }
}

impl Routes for RouterGroup<'_> {
    fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.handlers.push(middleware);
        self
    }

    fn handle(
        &mut self,
        method: Method,
        relative_path: &str,
        handlers: Vec<HandlerFunc>,
    ) -> Result<&mut Self, RouteError> {
        let path = join_paths(&self.base_path, relative_path);
        let chain = combine(&self.handlers, handlers);
        self.engine.add_route(method, &path, chain.into())?;
        Ok(self)
    }
}
