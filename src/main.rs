use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

use thoughtbook::config::{AppState, Config};
use thoughtbook::{logger, server};

/// Social network REST API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file, with or without extension
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    // Size the runtime from `server.workers`, defaulting to one thread per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let store = cfg.open_store()?;
    let listener = server::bind_listener(addr, cfg.performance.backlog)?;

    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::spawn_shutdown_listener(Arc::clone(&shutdown))?;

    let state = Arc::new(AppState::new(cfg, store));
    server::serve(listener, state, shutdown).await?;

    log::info!("server stopped");
    Ok(())
}
