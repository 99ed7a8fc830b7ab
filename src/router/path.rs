//! Path and header string helpers used by groups and the request context.

/// Join a group's base path and a relative path.
///
/// An empty `relative` yields `base` unchanged. Otherwise the two are joined
/// with `/` and every run of consecutive slashes collapses to one, so
/// `join_paths("/api/", "/users")` is `/api/users`. A trailing slash on
/// `relative` is kept.
#[must_use]
pub fn join_paths(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_owned();
    }

    let mut out = String::with_capacity(base.len() + relative.len() + 1);
    for c in base.chars().chain(std::iter::once('/')).chain(relative.chars()) {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Strip parameters from a header value: everything from the first space or `;`.
///
/// `application/json; charset=utf-8` becomes `application/json`.
#[must_use]
pub fn filter_flags(content: &str) -> &str {
    match content.find([' ', ';']) {
        Some(end) => &content[..end],
        None => content,
    }
}
