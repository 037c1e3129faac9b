//! HTTP response building module
//!
//! Builders for the handful of response shapes the dispatcher sends.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// Build a plain text response
pub fn build_text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_response(status, TEXT_PLAIN, body.into())
}

/// Build a JSON response from an already serialized body
pub fn build_json_response(body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_response(StatusCode::OK, APPLICATION_JSON, body.into())
}

/// Build 200 response with no body and no content type (preflight answer)
pub fn build_empty_response() -> Response<Full<Bytes>> {
    Response::new(Full::new(Bytes::new()))
}

/// Build 500 response carrying `message` as plain text
pub fn build_500_response(message: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn build_response(status: StatusCode, content_type: &str, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!(
        "Failed to build {} response: {error}",
        status.as_u16()
    ));
}
