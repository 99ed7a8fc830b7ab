//! Captured path parameters.
//!
//! Lookups append into a caller-owned [`Params`] buffer instead of returning a
//! fresh map, so a connection can reuse one buffer for every request it serves.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of path parameters before the buffer spills to the heap.
/// Most routes have ≤4 params (e.g. `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// A single captured path parameter.
///
/// The key is shared with the route tree (`Arc::clone` is an atomic increment),
/// the value is per-request data taken from the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: Arc<str>,
    pub value: String,
}

impl Param {
    pub(crate) fn new(key: &Arc<str>, value: &str) -> Self {
        Self {
            key: Arc::clone(key),
            value: value.to_owned(),
        }
    }
}

/// Ordered list of captured parameters, left to right as they appear in the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: SmallVec<[Param; MAX_INLINE_PARAMS]>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name
    ///
    /// Uses "last write wins" semantics: if the same name is captured twice
    /// (e.g. `/org/:id/user/:id`), the rightmost capture is returned.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rfind(|p| p.key.as_ref() == name)
            .map(|p| p.value.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.inner.iter()
    }

    /// Drop all captured values, keeping any heap capacity for the next request.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Whether the buffer has outgrown its inline storage.
    #[must_use]
    pub fn spilled(&self) -> bool {
        self.inner.spilled()
    }

    /// Convert to a `HashMap`.
    /// Note: this allocates; use [`Params::get`] on the hot path.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.inner
            .iter()
            .map(|p| (p.key.to_string(), p.value.clone()))
            .collect()
    }

    pub(crate) fn push(&mut self, param: Param) {
        self.inner.push(param);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Arc<str> {
        Arc::from(name)
    }

    #[test]
    fn test_get_last_write_wins() {
        let mut params = Params::new();
        params.push(Param::new(&key("id"), "org-1"));
        params.push(Param::new(&key("team"), "core"));
        params.push(Param::new(&key("id"), "user-7"));

        assert_eq!(params.get("id"), Some("user-7"));
        assert_eq!(params.get("team"), Some("core"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_truncate_and_clear() {
        let mut params = Params::new();
        params.push(Param::new(&key("a"), "1"));
        params.push(Param::new(&key("b"), "2"));
        params.truncate(1);
        assert_eq!(params.get("b"), None);
        assert_eq!(params.get("a"), Some("1"));

        params.clear();
        assert!(params.is_empty());
    }

    #[test]
    fn test_stays_inline_up_to_limit() {
        let mut params = Params::new();
        let k = key("p");
        for i in 0..MAX_INLINE_PARAMS {
            params.push(Param::new(&k, &i.to_string()));
        }
        assert!(!params.spilled());
        params.push(Param::new(&k, "overflow"));
        assert!(params.spilled());
    }

    #[test]
    fn test_to_map() {
        let mut params = Params::new();
        params.push(Param::new(&key("user_id"), "42"));
        let map = params.to_map();
        assert_eq!(map.get("user_id"), Some(&"42".to_string()));
    }
}
