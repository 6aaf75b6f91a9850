use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use activity_data::ActivityStore;
use clap::Parser;
use server::{routes, server_state::ServerState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serves recorded sessions and their weather series over HTTP.
#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Directory containing data/sessions.json and data/weather.json.
    /// Defaults to the project root.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Log file, in addition to stdout
    #[arg(long, default_value = "server/log/server.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(dir) = args.log_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace,tower_http=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    let store = match &args.root {
        Some(root) => ActivityStore::open(root).await,
        None => ActivityStore::start().await,
    }
    .map_err(|err| anyhow::anyhow!("Failed to open activity data: {err}"))?;

    let server_state = Arc::new(ServerState { store });
    let app = routes::router(server_state);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
