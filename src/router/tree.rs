//! Radix tree implementation for HTTP route matching
//!
//! This module provides a compressed prefix tree (radix tree) that maps a request
//! path to a registered value in O(k) where k is the path length, independent of
//! the number of registered routes.
//!
//! ## Key Properties
//!
//! - **Compressed**: shared prefixes (e.g. `/api/v1/`) are stored exactly once and
//!   nodes are split on insertion whenever two patterns diverge inside a segment
//! - **Byte-indexed**: each node keeps the first byte of every static child in
//!   `indices`, so choosing the next branch is a single byte comparison per child
//! - **Wildcards last**: a node has at most one wildcard child and it is always the
//!   last element of `children`
//! - **Read-only lookups**: matching takes `&self`; the tree can be shared between
//!   threads once registration is finished
//!
//! ## Pattern Syntax
//!
//! ```text
//! /users/list          static segment, matches exactly
//! /users/:id           named parameter, matches one path segment
//! /static/*filepath    catch-all, matches the rest of the path; must be last
//! ```
//!
//! ## Precedence
//!
//! At every branch point static children are tried before the wildcard child, so
//! literal segments shadow parameters and parameters shadow catch-alls. When a
//! static branch dead-ends, the lookup resumes at the most recent wildcard it
//! skipped. Once a wildcard has been taken there is no backtracking into static
//! siblings of that wildcard.

use smallvec::SmallVec;
use std::fmt;
use std::mem;
use std::sync::Arc;

use super::error::RouteError;
use super::params::{Param, Params};

/// What a node matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Literal byte sequence
    #[default]
    Static,
    /// Root of a method tree (matches like `Static`)
    Root,
    /// `:name`, one path segment
    Param,
    /// `*name`, the remainder of the path
    CatchAll,
}

/// Node in the radix tree
///
/// `indices[i]` is the first byte of `children[i].segment` for every static
/// child. A wildcard child, if any, is the last child and has no index entry.
pub struct Node<T> {
    /// Path bytes this node represents. Kept as bytes so that splits may fall
    /// inside a multi-byte character without breaking UTF-8 invariants.
    segment: Vec<u8>,
    kind: NodeKind,
    indices: Vec<u8>,
    children: Vec<Node<T>>,
    wild_child: bool,
    /// Present only on nodes that terminate a registered route
    value: Option<T>,
    /// Parameter name for `Param` and terminal `CatchAll` nodes
    name: Option<Arc<str>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            segment: Vec::new(),
            kind: NodeKind::Static,
            indices: Vec::new(),
            children: Vec::new(),
            wild_child: false,
            value: None,
            name: None,
        }
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("segment", &String::from_utf8_lossy(&self.segment))
            .field("kind", &self.kind)
            .field("indices", &String::from_utf8_lossy(&self.indices))
            .field("wild_child", &self.wild_child)
            .field("has_value", &self.value.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Location of a `:name` or `*name` marker inside a pattern
struct Wildcard {
    start: usize,
    end: usize,
    valid: bool,
}

/// Find the first wildcard in `path`.
///
/// The wildcard runs up to the next `/` or the end of the path; it is invalid if
/// that range contains another `:` or `*`.
fn find_wildcard(path: &[u8]) -> Option<Wildcard> {
    let start = path.iter().position(|&c| c == b':' || c == b'*')?;
    let mut valid = true;
    for (offset, &c) in path[start + 1..].iter().enumerate() {
        match c {
            b'/' => {
                return Some(Wildcard {
                    start,
                    end: start + 1 + offset,
                    valid,
                })
            }
            b':' | b'*' => valid = false,
            _ => {}
        }
    }
    Some(Wildcard {
        start,
        end: path.len(),
        valid,
    })
}

/// Reject malformed wildcard syntax before the tree is touched.
fn validate_pattern(full: &str) -> Result<(), RouteError> {
    let bytes = full.as_bytes();
    let mut offset = 0;
    while let Some(w) = find_wildcard(&bytes[offset..]) {
        let start = offset + w.start;
        let end = offset + w.end;
        let wildcard = &bytes[start..end];
        if !w.valid {
            return Err(RouteError::MultipleWildcards {
                wildcard: lossy(wildcard),
                path: full.to_owned(),
            });
        }
        if wildcard.len() < 2 {
            return Err(RouteError::UnnamedWildcard {
                path: full.to_owned(),
            });
        }
        if wildcard[0] == b'*' {
            if end != bytes.len() {
                return Err(RouteError::CatchAllNotLast {
                    path: full.to_owned(),
                });
            }
            if start == 0 || bytes[start - 1] != b'/' {
                return Err(RouteError::CatchAllMissingSlash {
                    path: full.to_owned(),
                });
            }
        }
        offset = end;
    }
    Ok(())
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn param_name(marker: &[u8]) -> Arc<str> {
    Arc::from(String::from_utf8_lossy(&marker[1..]).as_ref())
}

/// A wildcard branch passed over in favour of a static child
struct Skipped<'n, 'p, T> {
    node: &'n Node<T>,
    path: &'p [u8],
    params_len: usize,
}

type SkipStack<'n, 'p, T> = SmallVec<[Skipped<'n, 'p, T>; 4]>;

/// Outcome of one lookup step
enum Step<'n, 'p, T> {
    Next(&'n Node<T>, &'p [u8]),
    Found(&'n T),
    Miss,
}

impl<T> Node<T> {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// The path bytes of this node, lossily decoded
    #[must_use]
    pub fn segment(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.segment)
    }

    /// Register `value` for the exact pattern `path`.
    ///
    /// Wildcard syntax is validated before any node is modified. A conflict
    /// detected later may leave behind node splits, which never change what
    /// the tree matches.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for malformed patterns, wildcard conflicts and
    /// duplicate registrations.
    pub fn add_route(&mut self, path: &str, value: T) -> Result<(), RouteError> {
        validate_pattern(path)?;

        if self.segment.is_empty() && self.indices.is_empty() {
            self.insert_child(path.as_bytes(), path, value)?;
            self.kind = NodeKind::Root;
            return Ok(());
        }
        self.split_or_make_node(path.as_bytes(), path, value)
    }

    /// Insert `child`, keeping the wildcard child (if any) last.
    fn add_child(&mut self, child: Node<T>) -> usize {
        if self.wild_child && !self.children.is_empty() {
            let at = self.children.len() - 1;
            self.children.insert(at, child);
            at
        } else {
            self.children.push(child);
            self.children.len() - 1
        }
    }

    /// Reconcile `path` with this node's segment, splitting the node when the
    /// two diverge inside the segment, then descend or terminate.
    fn split_or_make_node(&mut self, path: &[u8], full: &str, value: T) -> Result<(), RouteError> {
        let common = longest_common_prefix(path, &self.segment);

        if common < self.segment.len() {
            let child = Node {
                segment: self.segment.split_off(common),
                kind: NodeKind::Static,
                indices: mem::take(&mut self.indices),
                children: mem::take(&mut self.children),
                wild_child: self.wild_child,
                value: self.value.take(),
                name: self.name.take(),
            };
            self.indices = vec![child.segment[0]];
            self.children = vec![child];
            self.wild_child = false;
        }

        if common < path.len() {
            let path = &path[common..];
            let next = path[0];

            // A param's only continuation starts with '/'; go straight there.
            if self.kind == NodeKind::Param && next == b'/' && self.children.len() == 1 {
                return self.children[0].split_or_make_node(path, full, value);
            }

            if let Some(i) = self.indices.iter().position(|&c| c == next) {
                return self.children[i].split_or_make_node(path, full, value);
            }

            if next != b':' && next != b'*' && self.kind != NodeKind::CatchAll {
                self.indices.push(next);
                let at = self.add_child(Node::new());
                return self.children[at].insert_child(path, full, value);
            }

            if self.wild_child {
                if let Some(wild) = self.children.last_mut() {
                    let existing = wild.segment.len();
                    let compatible = path.len() >= existing
                        && path[..existing] == wild.segment[..]
                        && wild.kind != NodeKind::CatchAll
                        && (existing == path.len() || path[existing] == b'/');
                    if compatible {
                        return wild.split_or_make_node(path, full, value);
                    }
                    return Err(RouteError::WildcardConflict {
                        path: full.to_owned(),
                        segment: lossy(path),
                        existing: lossy(&wild.segment),
                    });
                }
            }

            return self.insert_child(path, full, value);
        }

        if self.value.is_some() {
            return Err(RouteError::DuplicateRoute {
                path: full.to_owned(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Lay out the remainder of a pattern below this node, creating param and
    /// catch-all nodes for each wildcard it contains.
    fn insert_child(&mut self, mut path: &[u8], full: &str, value: T) -> Result<(), RouteError> {
        let mut node = self;

        while let Some(w) = find_wildcard(path) {
            let wildcard = &path[w.start..w.end];
            if !w.valid {
                return Err(RouteError::MultipleWildcards {
                    wildcard: lossy(wildcard),
                    path: full.to_owned(),
                });
            }
            if wildcard.len() < 2 {
                return Err(RouteError::UnnamedWildcard {
                    path: full.to_owned(),
                });
            }

            if wildcard[0] == b':' {
                if w.start > 0 {
                    node.segment = path[..w.start].to_vec();
                    path = &path[w.start..];
                }

                let child = Node {
                    segment: wildcard.to_vec(),
                    kind: NodeKind::Param,
                    name: Some(param_name(wildcard)),
                    ..Node::new()
                };
                let at = node.add_child(child);
                node.wild_child = true;
                let param = &mut node.children[at];

                if wildcard.len() < path.len() {
                    path = &path[wildcard.len()..];
                    param.children.push(Node::new());
                    node = &mut param.children[0];
                    continue;
                }

                param.value = Some(value);
                return Ok(());
            }

            if w.end != path.len() {
                return Err(RouteError::CatchAllNotLast {
                    path: full.to_owned(),
                });
            }
            if node.segment.last() == Some(&b'/') {
                return Err(RouteError::CatchAllConflict {
                    path: full.to_owned(),
                });
            }
            if w.start == 0 || path[w.start - 1] != b'/' {
                return Err(RouteError::CatchAllMissingSlash {
                    path: full.to_owned(),
                });
            }

            let slash = w.start - 1;
            node.segment = path[..slash].to_vec();

            let terminal = Node {
                segment: path[slash..].to_vec(),
                kind: NodeKind::CatchAll,
                value: Some(value),
                name: Some(param_name(wildcard)),
                ..Node::new()
            };
            let branch = Node {
                kind: NodeKind::CatchAll,
                wild_child: true,
                children: vec![terminal],
                ..Node::new()
            };
            node.add_child(branch);
            node.indices = vec![b'/'];
            return Ok(());
        }

        node.segment = path.to_vec();
        node.value = Some(value);
        Ok(())
    }

    /// Find the value registered for `path`.
    ///
    /// Captured parameters are appended to `params` in left-to-right order. On
    /// a miss, `params` is left with whatever it held before the call.
    pub fn resolve(&self, path: &str, params: &mut Params) -> Option<&T> {
        let base = params.len();
        let mut skipped: SkipStack<'_, '_, T> = SmallVec::new();
        let mut step = self.step(path.as_bytes(), params, &mut skipped);

        loop {
            match step {
                Step::Next(node, rest) => step = node.step(rest, params, &mut skipped),
                Step::Found(value) => return Some(value),
                Step::Miss => match skipped.pop() {
                    Some(point) => {
                        params.truncate(point.params_len);
                        step = point.node.enter_wildcard(point.path, params);
                    }
                    None => {
                        params.truncate(base);
                        return None;
                    }
                },
            }
        }
    }

    fn step<'n, 'p>(
        &'n self,
        path: &'p [u8],
        params: &mut Params,
        skipped: &mut SkipStack<'n, 'p, T>,
    ) -> Step<'n, 'p, T> {
        let prefix = self.segment.as_slice();

        if path.len() > prefix.len() && path.starts_with(prefix) {
            let rest = &path[prefix.len()..];
            let next = rest[0];

            if let Some(i) = self.indices.iter().position(|&c| c == next) {
                if self.wild_child {
                    skipped.push(Skipped {
                        node: self,
                        path: rest,
                        params_len: params.len(),
                    });
                }
                return Step::Next(&self.children[i], rest);
            }
            if self.wild_child {
                return self.enter_wildcard(rest, params);
            }
            return Step::Miss;
        }

        if path == prefix {
            return self.value.as_ref().map_or(Step::Miss, Step::Found);
        }
        Step::Miss
    }

    /// Name captured by a param or catch-all terminal node.
    fn wildcard_name(&self) -> &Arc<str> {
        match &self.name {
            Some(name) => name,
            None => unreachable!("{:?} wildcard node without a name", self.kind),
        }
    }

    /// Match `path` against this node's wildcard child.
    fn enter_wildcard<'n, 'p>(&'n self, path: &'p [u8], params: &mut Params) -> Step<'n, 'p, T> {
        let Some(wild) = self.children.last() else {
            return Step::Miss;
        };
        match wild.kind {
            NodeKind::Param => {
                let name = wild.wildcard_name();
                let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
                let Ok(captured) = std::str::from_utf8(&path[..end]) else {
                    return Step::Miss;
                };
                params.push(Param::new(name, captured));

                if end < path.len() {
                    return match wild.children.first() {
                        Some(child) => Step::Next(child, &path[end..]),
                        None => Step::Miss,
                    };
                }
                wild.value.as_ref().map_or(Step::Miss, Step::Found)
            }
            NodeKind::CatchAll => {
                // The '/' before the marker belongs to the pattern, not the capture.
                let name = wild.wildcard_name();
                let rest = path.strip_prefix(b"/").unwrap_or(path);
                let Ok(captured) = std::str::from_utf8(rest) else {
                    return Step::Miss;
                };
                params.push(Param::new(name, captured));
                wild.value.as_ref().map_or(Step::Miss, Step::Found)
            }
            NodeKind::Static | NodeKind::Root => {
                unreachable!("wildcard slot holds a {:?} node", wild.kind)
            }
        }
    }
}
