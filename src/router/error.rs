use std::fmt;

/// Route table construction error
///
/// Returned by [`Router::add_route`](super::Router::add_route) and the engine's
/// registration methods. Every variant is a programming error in the route
/// table, so callers usually abort startup when they see one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern does not start with `/`
    InvalidPath {
        /// The rejected pattern
        path: String,
    },
    /// A route was registered without any handler
    EmptyHandlers {
        /// The pattern being registered
        path: String,
    },
    /// A single path segment contains more than one `:` or `*` marker
    MultipleWildcards {
        /// The offending wildcard text
        wildcard: String,
        /// The pattern being registered
        path: String,
    },
    /// A `:` or `*` marker is not followed by a name
    UnnamedWildcard {
        /// The pattern being registered
        path: String,
    },
    /// A catch-all is followed by more path
    CatchAllNotLast {
        /// The pattern being registered
        path: String,
    },
    /// A catch-all would hang below a segment that is already a complete route root
    CatchAllConflict {
        /// The pattern being registered
        path: String,
    },
    /// A catch-all is not preceded by `/`
    CatchAllMissingSlash {
        /// The pattern being registered
        path: String,
    },
    /// The pattern needs a different wildcard at a branch point that already has one
    WildcardConflict {
        /// The pattern being registered
        path: String,
        /// The remaining part of the pattern at the branch point
        segment: String,
        /// The wildcard already registered at the branch point
        existing: String,
    },
    /// The exact pattern already has handlers
    DuplicateRoute {
        /// The pattern being registered
        path: String,
    },
}

impl RouteError {
    /// The pattern whose registration failed
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            RouteError::InvalidPath { path }
            | RouteError::EmptyHandlers { path }
            | RouteError::MultipleWildcards { path, .. }
            | RouteError::UnnamedWildcard { path }
            | RouteError::CatchAllNotLast { path }
            | RouteError::CatchAllConflict { path }
            | RouteError::CatchAllMissingSlash { path }
            | RouteError::WildcardConflict { path, .. }
            | RouteError::DuplicateRoute { path } => path,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPath { path } => {
                write!(f, "path must begin with '/', got '{}'", path)
            }
            RouteError::EmptyHandlers { path } => {
                write!(f, "there must be at least one handler for path '{}'", path)
            }
            RouteError::MultipleWildcards { wildcard, path } => {
                write!(
                    f,
                    "only one wildcard per path segment is allowed, has: '{}' in path '{}'",
                    wildcard, path
                )
            }
            RouteError::UnnamedWildcard { path } => {
                write!(
                    f,
                    "wildcards must be named with a non-empty name in path '{}'",
                    path
                )
            }
            RouteError::CatchAllNotLast { path } => {
                write!(
                    f,
                    "catch-all routes are only allowed at the end of the path in path '{}'",
                    path
                )
            }
            RouteError::CatchAllConflict { path } => {
                write!(
                    f,
                    "catch-all conflicts with existing handle for the path segment root in path '{}'",
                    path
                )
            }
            RouteError::CatchAllMissingSlash { path } => {
                write!(f, "no / before catch-all in path '{}'", path)
            }
            RouteError::WildcardConflict {
                path,
                segment,
                existing,
            } => {
                write!(
                    f,
                    "'{}' in new path '{}' conflicts with existing wildcard '{}'",
                    segment, path, existing
                )
            }
            RouteError::DuplicateRoute { path } => {
                write!(f, "handlers are already registered for path '{}'", path)
            }
        }
    }
}

impl std::error::Error for RouteError {}
