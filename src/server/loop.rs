// Server loop module
// Accepts connections until the shutdown future completes

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Accept errors (fd exhaustion, aborted handshakes) are logged and the loop
/// keeps going. In-flight connections are not awaited on shutdown.
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        serve_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                if let Some(message) = poisoned_dispatcher_notice(&state) {
                    logger::log_warning(&message);
                }
                break;
            }
        }
    }
}

/// Shutdown notice when a failed request dump left every response a 500
fn poisoned_dispatcher_notice(state: &AppState) -> Option<String> {
    state
        .dispatcher
        .last_error()
        .map(|err| format!("Requests were answered with 500 since a request dump failed: {err}"))
}
