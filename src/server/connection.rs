// Connection handling module
// Serves one accepted TCP connection with the shared dispatcher

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

/// Handle a single connection in a spawned task.
///
/// HTTP/1.1 framing, keep-alive and header parsing are hyper's; every parsed
/// request goes to the dispatcher.
pub fn serve_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(dispatch(&state, peer_addr, req).await) }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Run the dispatcher and write the access log line if enabled
async fn dispatch(
    state: &AppState,
    peer_addr: SocketAddr,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let Some(format) = state.access_log_format.as_deref() else {
        return state.dispatcher.handle(req).await;
    };

    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().to_string(),
        format!("{:?}", req.version()),
    );

    let resp = state.dispatcher.handle(req).await;

    entry.status = resp.status().as_u16();
    entry.body_bytes = resp.body().size_hint().exact().unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);

    resp
}
