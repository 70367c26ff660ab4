use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_server::{BlobStorage, FileStorage, MemoryStorage, TodoStore};

/// Serve a single todo list over HTTP.
#[derive(Debug, Parser)]
#[command(name = "todo-server", version)]
struct Args {
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory holding `todos.json`. Without it the list lives in memory.
    #[arg(long, env = "TODO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, env = "TODO_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage: Arc<dyn BlobStorage> = match &args.data_dir {
        Some(dir) => {
            let storage = FileStorage::new(dir);
            info!(dir = %storage.dir().display(), "persisting todos to disk");
            Arc::new(storage)
        }
        None => {
            info!("no data directory configured, todos kept in memory");
            Arc::new(MemoryStorage::new())
        }
    };
    let store = TodoStore::open(storage);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    todo_server::run(listener, store)
        .await
        .context("server terminated")
}
