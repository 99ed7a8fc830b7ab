//! Router core module - per-method route table.
//!
//! Registration happens once at startup through [`Router::add_route`]; request
//! handling only ever calls [`Router::resolve`], which takes `&self` and
//! allocates nothing beyond the captured parameter values.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::error::RouteError;
use super::params::Params;
use super::tree::Node;

/// Lookups slower than this are reported at `warn`.
const SLOW_LOOKUP: Duration = Duration::from_millis(1);

/// Tree values are indices into [`Router::routes`].
struct MethodTree {
    method: Method,
    root: Node<usize>,
}

/// A registered route, in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry<T> {
    pub method: Method,
    pub pattern: String,
    pub value: T,
}

/// Route table holding one radix tree per HTTP method
///
/// Methods are fully isolated: a pattern registered for `GET` never matches a
/// `POST` request. The number of distinct methods is small, so trees are kept
/// in a `Vec` and found by linear scan. Values live once, in the route list;
/// the trees map paths to positions in it.
///
/// # Performance
///
/// - Route matching: O(k) where k is path length, not the number of routes
/// - Memory: shared prefixes are stored once per method tree
pub struct Router<T> {
    trees: Vec<MethodTree>,
    routes: Vec<RouteEntry<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            trees: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("methods", &self.trees.iter().map(|t| &t.method).collect::<Vec<_>>())
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl<T> Router<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` for `method` and `pattern`
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPath`] if `pattern` does not start with `/`,
    /// or any tree construction error for malformed or conflicting patterns.
    ///
    /// # Example
    ///
    /// ```rust
    /// use http::Method;
    /// use rum::router::{Params, Router};
    ///
    /// let mut router = Router::new();
    /// router.add_route(Method::GET, "/users/:id", "show_user").unwrap();
    ///
    /// let mut params = Params::new();
    /// assert_eq!(router.resolve(&Method::GET, "/users/7", &mut params), Some(&"show_user"));
    /// assert_eq!(params.get("id"), Some("7"));
    /// ```
    pub fn add_route(&mut self, method: Method, pattern: &str, value: T) -> Result<(), RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::InvalidPath {
                path: pattern.to_owned(),
            });
        }

        let index = match self.trees.iter().position(|t| t.method == method) {
            Some(index) => index,
            None => {
                self.trees.push(MethodTree {
                    method: method.clone(),
                    root: Node::new(),
                });
                self.trees.len() - 1
            }
        };

        self.trees[index].root.add_route(pattern, self.routes.len())?;

        debug!(method = %method, pattern = %pattern, "Route inserted into radix tree");
        self.routes.push(RouteEntry {
            method,
            pattern: pattern.to_owned(),
            value,
        });
        Ok(())
    }

    /// Match `method` and `path` to a registered value
    ///
    /// Captured parameters are appended to `params`, which the caller owns and
    /// typically clears between requests.
    ///
    /// # Returns
    ///
    /// * `Some(&T)` - the value registered for the matching pattern
    /// * `None` - unknown method or no matching pattern
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str, params: &mut Params) -> Option<&T> {
        let Some(tree) = self.trees.iter().find(|t| t.method == *method) else {
            debug!(method = %method, path = %path, "No routes registered for method");
            return None;
        };

        let match_start = Instant::now();
        let found = tree
            .root
            .resolve(path, params)
            .and_then(|&i| self.routes.get(i))
            .map(|route| &route.value);
        let match_duration = match_start.elapsed();

        if match_duration > SLOW_LOOKUP {
            warn!(
                method = %method,
                path = %path,
                matched = found.is_some(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else if found.is_none() {
            debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
        }

        found
    }

    /// The tree for `method`, if any route was registered for it
    ///
    /// Its values are positions in [`Router::routes`].
    #[must_use]
    pub fn tree(&self, method: &Method) -> Option<&Node<usize>> {
        self.trees
            .iter()
            .find(|t| t.method == *method)
            .map(|t| &t.root)
    }

    /// Methods that have at least one route, in first-registration order
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.iter().map(|t| &t.method)
    }

    /// All registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteEntry<T>] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
