//! The engine: route table of handler chains plus the request entry point.

use http::Method;
use std::io;
use std::mem;
use std::net::ToSocketAddrs;
use std::sync::Arc;
use tracing::{debug, info};

use crate::context::{Context, HandlerFunc, HandlersChain};
use crate::group::{combine, RouterGroup, Routes};
use crate::router::{join_paths, Params, RouteError, Router};
use crate::server::{AppService, HttpServer, Request, Response, ServerHandle};

/// Summary of one registered route, derived from the router's route list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    /// Length of the handler chain, middleware included
    pub handlers: usize,
}

/// Route table of handler chains with root-level middleware
///
/// Build it with [`Routes`] methods and groups, then either call
/// [`Engine::serve`] directly or hand it to the HTTP server with
/// [`Engine::run`] / [`Engine::start`]. Once serving starts the engine is
/// frozen behind an `Arc`.
#[derive(Default)]
pub struct Engine {
    router: Router<HandlersChain>,
    middleware: Vec<HandlerFunc>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("routes", &self.router.len())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a complete handler chain for `method` and absolute `path`
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPath`] if `path` does not start with `/`,
    /// [`RouteError::EmptyHandlers`] for an empty chain, and any tree
    /// construction error.
    pub fn add_route(
        &mut self,
        method: Method,
        path: &str,
        handlers: HandlersChain,
    ) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath {
                path: path.to_owned(),
            });
        }
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlers {
                path: path.to_owned(),
            });
        }

        let count = handlers.len();
        self.router.add_route(method.clone(), path, handlers)?;

        info!(method = %method, path = %path, handlers = count, "Route registered");
        Ok(())
    }

    /// Create a route group below `/`, inheriting the current middleware
    pub fn group(&mut self, relative_path: &str, handlers: Vec<HandlerFunc>) -> RouterGroup<'_> {
        let base_path = join_paths("/", relative_path);
        let handlers = combine(&self.middleware, handlers);
        RouterGroup::new(self, base_path, handlers)
    }

    /// Middleware that will be prepended to routes registered from now on
    #[must_use]
    pub fn middleware(&self) -> &[HandlerFunc] {
        &self.middleware
    }

    #[must_use]
    pub fn router(&self) -> &Router<HandlersChain> {
        &self.router
    }

    /// All registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.router
            .routes()
            .iter()
            .map(|route| RouteInfo {
                method: route.method.clone(),
                path: route.pattern.clone(),
                handlers: route.value.len(),
            })
            .collect()
    }

    /// Log the route table at `info`
    pub fn dump_routes(&self) {
        info!(count = self.router.len(), "Routing table");
        for route in self.routes() {
            info!(
                method = %route.method,
                path = %route.path,
                handlers = route.handlers,
                "Route"
            );
        }
    }

    /// Handle one request.
    ///
    /// `params` is cleared, filled by the lookup and handed to the
    /// [`Context`]; it comes back to the caller afterwards so its storage
    /// can be reused for the next request.
    pub fn serve(&self, request: Request, params: &mut Params) -> Response {
        params.clear();

        let Some(chain) = self
            .router
            .resolve(&request.method, &request.path, params)
            .map(Arc::clone)
        else {
            debug!(method = %request.method, path = %request.path, "Responding 404");
            return Response::not_found(&request.path);
        };

        let mut ctx = Context::new(request, mem::take(params), chain);
        ctx.next();
        let (response, used) = ctx.into_parts();
        *params = used;
        response
    }

    /// Start serving on `addr` in the background
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let handle = HttpServer(AppService::new(Arc::new(self))).start(addr)?;
        info!(addr = %handle.addr(), "rum server listening");
        Ok(handle)
    }

    /// Serve on `addr` until the server stops
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start or its coroutine panics.
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> io::Result<()> {
        self.start(addr)?
            .join()
            .map_err(|_| io::Error::other("server coroutine panicked"))
    }
}

impl Routes for Engine {
    fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    fn handle(
        &mut self,
        method: Method,
        relative_path: &str,
        handlers: Vec<HandlerFunc>,
    ) -> Result<&mut Self, RouteError> {
        let path = join_paths("/", relative_path);
        let chain = combine(&self.middleware, handlers);
        self.add_route(method, &path, chain.into())?;
        Ok(self)
    }
}
