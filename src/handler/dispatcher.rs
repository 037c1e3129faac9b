//! Request dispatcher
//!
//! Entry point for every request: CORS headers, optional request dump, sticky
//! failure short-circuit, preflight short-circuit, then canned routing.

use std::sync::OnceLock;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use super::dump::{self, DumpError, DumpSink};
use super::routes;
use crate::http;
use crate::logger;

/// Construction options for [`Dispatcher`]
#[derive(Default)]
pub struct DispatcherOptions {
    debug: bool,
    sink: DumpSink,
}

impl DispatcherOptions {
    /// Debug logging off, dumps (once enabled) go to stdout
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn enable_debug_logging(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub fn dump_to(mut self, sink: DumpSink) -> Self {
        self.sink = sink;
        self
    }

    pub const fn debug_enabled(&self) -> bool {
        self.debug
    }
}

/// Shared request handler, one per process
pub struct Dispatcher {
    debug: bool,
    sink: DumpSink,
    /// First dump failure; never cleared
    last_error: OnceLock<DumpError>,
}

impl Dispatcher {
    pub fn new(options: DispatcherOptions) -> Self {
        Self {
            debug: options.debug,
            sink: options.sink,
            last_error: OnceLock::new(),
        }
    }

    /// The recorded dump failure, if any
    pub fn last_error(&self) -> Option<&DumpError> {
        self.last_error.get()
    }

    /// Handle one request
    ///
    /// Once a dump has failed every later request, preflight included, is
    /// answered with 500 and the failure message.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();

        if self.debug && self.last_error.get().is_none() {
            if let Err(e) = self.dump_request(&parts, body).await {
                logger::log_error(&format!(
                    "Request dump failed, all further requests will fail: {e}"
                ));
                // Concurrent first failures: the earliest stored one wins
                let _ = self.last_error.set(e);
            }
        }

        let mut resp = if let Some(err) = self.last_error.get() {
            http::build_500_response(err.to_string())
        } else if parts.method == Method::OPTIONS {
            http::build_empty_response()
        } else {
            routes::route(parts.uri.path())
        };

        http::apply_cors_headers(resp.headers_mut());
        resp
    }

    async fn dump_request<B>(
        &self,
        parts: &hyper::http::request::Parts,
        body: B,
    ) -> Result<(), DumpError>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let body = body
            .collect()
            .await
            .map_err(|e| DumpError::Body(e.to_string()))?
            .to_bytes();

        self.sink
            .write_dump(&dump::format_request_dump(parts, &body))?;
        Ok(())
    }
}
