//! Per-request context threaded through a handler chain.
//!
//! A [`Context`] owns the parsed request, the response under construction and
//! the captured path parameters. Handlers run in registration order; a
//! middleware can wrap the rest of the chain by calling [`Context::next`] and
//! doing work after it returns, or stop it with [`Context::abort`].

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::router::{filter_flags, Params};
use crate::server::{Request, Response};

/// A request handler or middleware
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// The immutable handler chain stored in the route tree
pub type HandlersChain = Arc<[HandlerFunc]>;

/// Wrap a closure as a [`HandlerFunc`]
pub fn handler_fn<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Chain cursor value once the chain has been aborted.
const ABORT_INDEX: usize = usize::MAX / 2;

pub const MIME_JSON: &str = "application/json";
pub const MIME_HTML: &str = "text/html";
pub const MIME_PLAIN: &str = "text/plain";

/// Source a request is decoded from by [`Context::bind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The body, as JSON
    Json,
    /// The query string
    Query,
}

impl Binding {
    /// `GET` always binds the query string; other methods bind a JSON body
    /// when the media type says so.
    #[must_use]
    pub fn select(method: &Method, content_type: &str) -> Self {
        if *method != Method::GET && content_type == MIME_JSON {
            Binding::Json
        } else {
            Binding::Query
        }
    }
}

/// Decode string `fields` into `T`.
///
/// Values are first offered as strings. If `T` rejects that, values that
/// parse as integers, floats or booleans are offered typed instead, so
/// `limit: u32` accepts `"1000"`.
fn bind_fields<'a, T, I>(fields: I) -> serde_json::Result<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let fields: Vec<(&str, &str)> = fields.into_iter().collect();
    let as_strings = fields
        .iter()
        .map(|&(k, v)| (k.to_owned(), Value::String(v.to_owned())))
        .collect::<Map<_, _>>();

    serde_json::from_value(Value::Object(as_strings)).or_else(|err| {
        let typed = fields
            .iter()
            .map(|&(k, v)| (k.to_owned(), scalar_value(v)))
            .collect::<Map<_, _>>();
        serde_json::from_value(Value::Object(typed)).map_err(|_| err)
    })
}

fn scalar_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(raw.to_owned()), Value::Number)
}

pub struct Context {
    request: Request,
    response: Response,
    params: Params,
    handlers: HandlersChain,
    /// Index of the next handler to run
    index: usize,
    keys: HashMap<String, Box<dyn Any + Send + Sync>>,
    errors: Vec<anyhow::Error>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.request.method)
            .field("path", &self.request.path)
            .field("params", &self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("status", &self.response.status)
            .finish()
    }
}

impl Context {
    #[must_use]
    pub fn new(request: Request, params: Params, handlers: HandlersChain) -> Self {
        Self {
            request,
            response: Response::default(),
            params,
            handlers,
            index: 0,
            keys: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Run the remaining handlers of the chain.
    ///
    /// Called once by the engine to start the chain, and by middleware that
    /// needs to run code after the handlers below it.
    pub fn next(&mut self) {
        let handlers = Arc::clone(&self.handlers);
        while self.index < handlers.len() {
            let handler = &handlers[self.index];
            self.index += 1;
            handler(self);
        }
    }

    /// Prevent the handlers after the current one from running.
    ///
    /// Middleware that already called [`Context::next`] still resumes.
    pub fn abort(&mut self) {
        self.index = ABORT_INDEX;
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.index >= ABORT_INDEX
    }

    /// Store a value for later handlers in this request
    pub fn set<V: Any + Send + Sync>(&mut self, key: &str, value: V) {
        self.keys.insert(key.to_owned(), Box::new(value));
    }

    /// A value stored with [`Context::set`], if present and of type `V`
    #[must_use]
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.keys.get(key).and_then(|v| v.downcast_ref::<V>())
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.request.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.request.path
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// A captured path parameter; the rightmost capture wins on duplicate names
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.request.query_params.get(name).map(String::as_str)
    }

    /// A request header (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// The request's media type without parameters such as `charset`
    #[must_use]
    pub fn content_type(&self) -> &str {
        filter_flags(self.header("content-type").unwrap_or(""))
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn status(&mut self, code: StatusCode) {
        self.response.status = code;
    }

    /// Set a response header
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.response.set_header(name, value);
    }

    pub fn string(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write_body(code, MIME_PLAIN, body.into().into_bytes());
    }

    pub fn html(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write_body(code, MIME_HTML, body.into().into_bytes());
    }

    /// Serialize `value` as the JSON response body.
    ///
    /// A value that fails to serialize yields a `500` carrying the error text.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write_body(code, MIME_JSON, body),
            Err(err) => {
                self.string(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
                self.error(err);
            }
        }
    }

    /// Raw response body; the content type is left as is
    pub fn data(&mut self, code: StatusCode, body: impl Into<Vec<u8>>) {
        self.response.status = code;
        self.response.body = body.into();
    }

    fn write_body(&mut self, code: StatusCode, content_type: &str, body: Vec<u8>) {
        self.set_header("Content-Type", content_type);
        self.response.status = code;
        self.response.body = body;
    }

    /// Decode the request body as JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed or mismatched input.
    pub fn bind_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.request.body)
    }

    /// Decode the captured path parameters into `T`, whose fields are matched
    /// by parameter name. Numeric and boolean fields accept values such as
    /// `"42"` and `"true"`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when a required field has no parameter.
    pub fn bind_uri<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        bind_fields(self.params.iter().map(|p| (p.key.as_ref(), p.value.as_str())))
    }

    /// Decode the query parameters into `T`, with the same rules as [`Context::bind_uri`]
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when a required field is missing.
    pub fn bind_query<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        bind_fields(
            self.request
                .query_params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Decode the request headers into `T`; header names are lowercase, so
    /// fields match `rate`, `x-request-id` (via `#[serde(rename)]`) and so on
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when a required header is missing.
    pub fn bind_header<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        bind_fields(
            self.request
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Decode with the binding [`Binding::select`] picks for this request
    ///
    /// # Errors
    ///
    /// Returns the error of the selected binder.
    pub fn bind<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match Binding::select(self.method(), self.content_type()) {
            Binding::Json => self.bind_json(),
            Binding::Query => self.bind_query(),
        }
    }

    /// Attach an error to the request for middleware to inspect
    pub fn error(&mut self, err: impl Into<anyhow::Error>) {
        self.errors.push(err.into());
    }

    #[must_use]
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    /// Finish the request, returning the response and the params buffer for reuse.
    #[must_use]
    pub fn into_parts(self) -> (Response, Params) {
        (self.response, self.params)
    }
}
