use http::Method;
use may_minihttp::Request as RawRequest;
use std::collections::HashMap;
use std::io::{self, Read};
use tracing::debug;

/// Parsed HTTP request handed to the engine.
///
/// Decoupled from the wire type so the engine and handlers can be driven
/// without a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path with the query string removed
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// Raw request body
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request for `target`, which may carry a query string.
    ///
    /// ```rust
    /// use http::Method;
    /// use rum::server::Request;
    ///
    /// let req = Request::new(Method::GET, "/search?q=rust&page=2");
    /// assert_eq!(req.path, "/search");
    /// assert_eq!(req.query_params.get("page").map(String::as_str), Some("2"));
    /// ```
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or("/");
        Self {
            method,
            path: path.to_owned(),
            headers: HashMap::new(),
            query_params: parse_query_params(target),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value.as_str());
        }
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Parse query string parameters from a request target
///
/// Extracts everything after the `?` character and URL-decodes parameter names and values.
/// Repeated names keep the last value.
///
/// # Arguments
///
/// * `target` - The request target (e.g., `/users?limit=10&offset=20`)
#[must_use]
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    match target.find('?') {
        Some(pos) => url::form_urlencoded::parse(target[pos + 1..].as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Parse an incoming `may_minihttp` request into a [`Request`]
///
/// # Errors
///
/// Returns `InvalidInput` for a method token `http` cannot represent, or the
/// underlying I/O error if the body cannot be read.
pub fn parse_request(req: RawRequest) -> io::Result<Request> {
    let method = Method::from_bytes(req.method().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut request = Request::new(method, req.path());

    request.headers = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    req.body().read_to_end(&mut request.body)?;

    debug!(
        method = %request.method,
        path = %request.path,
        header_count = request.headers.len(),
        query_count = request.query_params.len(),
        body_size_bytes = request.body.len(),
        "HTTP request parsed"
    );

    Ok(request)
}
