use http::StatusCode;
use may_minihttp::{HttpService, Request as RawRequest, Response as RawResponse};
use std::io;
use std::sync::Arc;
use tracing::warn;

use super::request::parse_request;
use super::response::{write_response, Response};
use crate::engine::Engine;
use crate::router::Params;

/// `may_minihttp` service driving an [`Engine`]
///
/// The server clones the service for every connection, so each connection
/// gets its own params buffer while the engine is shared.
#[derive(Clone)]
pub struct AppService {
    engine: Arc<Engine>,
    params: Params,
}

impl AppService {
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: RawRequest, res: &mut RawResponse) -> io::Result<()> {
        let request = match parse_request(req) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Rejecting unparseable request");
                write_response(Response::text(StatusCode::BAD_REQUEST, err.to_string()), res);
                return Ok(());
            }
        };

        let response = self.engine.serve(request, &mut self.params);
        write_response(response, res);
        Ok(())
    }
}
