use clap::Parser;
use photo_store::{config::Config, routes::create_router, utils::init_logger, AppState, PhotoStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Photo upload service backed by a local directory
#[derive(Debug, Parser)]
#[command(name = "photo-store", version, about)]
struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding uploaded photos (overrides UPLOAD_DIR)
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Directory with index.html and static assets (overrides PUBLIC_DIR)
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// URL prefix stored photos are served under (overrides PUBLIC_URL_PREFIX)
    #[arg(long)]
    public_url_prefix: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.upload_dir {
            config.storage.upload_dir = dir;
        }
        if let Some(dir) = self.public_dir {
            config.storage.public_dir = dir;
        }
        if let Some(prefix) = self.public_url_prefix {
            config.storage.public_url_prefix = prefix;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger();

    // Load configuration
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    info!("Configuration loaded: {:?}", config);

    // The store root must exist before the first request
    let store = PhotoStore::open(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare photo storage: {}", e))?;
    info!(path = %store.root().display(), "Photo storage ready");

    let state = AppState {
        store: Arc::new(store),
        config: config.clone(),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
