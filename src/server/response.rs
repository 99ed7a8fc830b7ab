use dashmap::DashSet;
use http::StatusCode;
use may_minihttp::Response as RawResponse;
use once_cell::sync::Lazy;
use tracing::warn;

/// Upper bound on distinct interned header lines.
const MAX_INTERNED_HEADERS: usize = 4096;

/// Header lines handed to `may_minihttp`, which only accepts `&'static str`.
static HEADER_LINES: Lazy<DashSet<&'static str>> = Lazy::new(DashSet::new);

/// Response built by handlers before it is written to the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Header name/value pairs in insertion order
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `text/plain` response
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.set_header("Content-Type", "text/plain");
        response.body = body.into().into_bytes();
        response
    }

    /// The response for a request no route matched
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::text(StatusCode::NOT_FOUND, format!("404 NOT FOUND: {}\n", path))
    }

    /// Set a header, replacing any existing value with the same name
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.1 = value.to_owned(),
            None => self.headers.push((name.to_owned(), value.to_owned())),
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as UTF-8, if it is valid
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Return a `'static` copy of `line`, allocating it at most once.
fn intern_header_line(line: String) -> Option<&'static str> {
    if let Some(existing) = HEADER_LINES.get(line.as_str()) {
        return Some(*existing);
    }
    if HEADER_LINES.len() >= MAX_INTERNED_HEADERS {
        return None;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    HEADER_LINES.insert(leaked);
    Some(leaked)
}

/// Write `response` into the `may_minihttp` response buffer.
///
/// `Content-Length` is computed by the server and any handler-set value is
/// ignored.
pub fn write_response(response: Response, res: &mut RawResponse) {
    let reason = response.status.canonical_reason().unwrap_or("Unknown");
    res.status_code(usize::from(response.status.as_u16()), reason);

    for (name, value) in &response.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        match intern_header_line(format!("{}: {}", name, value)) {
            Some(line) => {
                res.header(line);
            }
            None => warn!(
                header = %name,
                limit = MAX_INTERNED_HEADERS,
                "Header dropped: interned header line limit reached"
            ),
        }
    }

    res.body_vec(response.body);
}
