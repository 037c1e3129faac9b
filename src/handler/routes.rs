//! Canned routes
//!
//! Exact-path table; anything not listed gets the default reply.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http;
use crate::logger;

type RouteFn = fn() -> Response<Full<Bytes>>;

pub const FAIL_500_BODY: &str = "something went terribly wrong";
pub const DEFAULT_BODY: &str = "foo bar";

const ROUTES: &[(&str, RouteFn)] = &[("/fail_500", fail_500), ("/user/1", user_one)];

/// The record served on `/user/1`
#[derive(Debug, Serialize)]
pub struct User {
    pub name: String,
    pub age: u32,
}

/// Pick the canned response for `path`
pub fn route(path: &str) -> Response<Full<Bytes>> {
    ROUTES
        .iter()
        .find(|(route_path, _)| *route_path == path)
        .map_or_else(default_reply, |(_, handler)| handler())
}

fn fail_500() -> Response<Full<Bytes>> {
    http::build_500_response(FAIL_500_BODY)
}

fn user_one() -> Response<Full<Bytes>> {
    let user = User {
        name: "groob".to_string(),
        age: 30,
    };
    match serde_json::to_vec(&user) {
        Ok(body) => http::build_json_response(body),
        Err(e) => {
            logger::log_error(&format!("Failed to encode user: {e}"));
            http::build_500_response(e.to_string())
        }
    }
}

fn default_reply() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, DEFAULT_BODY)
}
