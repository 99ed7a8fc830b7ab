//! Built-in middleware.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn};

use crate::context::{Context, HandlerFunc};

/// Request logging middleware
///
/// Opens a `request` span around the rest of the chain and logs one line per
/// request with its status and latency. Server errors are logged at `warn`.
#[must_use]
pub fn logger() -> HandlerFunc {
    Arc::new(|c: &mut Context| {
        let start = Instant::now();
        let span = info_span!("request", method = %c.method(), path = %c.path());
        let _entered = span.enter();

        c.next();

        let status = c.response().status;
        let latency_us = start.elapsed().as_micros();
        if status.is_server_error() {
            warn!(
                status = status.as_u16(),
                latency_us = latency_us,
                errors = c.errors().len(),
                aborted = c.is_aborted(),
                "Request failed"
            );
        } else {
            info!(
                status = status.as_u16(),
                latency_us = latency_us,
                aborted = c.is_aborted(),
                "Request completed"
            );
        }
    })
}
