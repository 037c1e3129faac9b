use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let options = cfg.dispatcher_options()?;

    let listener = server::create_reusable_listener(addr)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    logger::log_server_start(&addr, &cfg, &options);

    let state = Arc::new(config::AppState::new(&cfg, options));
    server::run(listener, state, server::shutdown_signal()).await;

    Ok(())
}
