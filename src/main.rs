use anyhow::Context;
use clap::Parser;
use knnrec_api::RestApi;
use knnrec_storage::DatasetManager;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// User-based collaborative-filtering recommender
#[derive(Parser, Debug)]
#[command(name = "knnrec")]
#[command(about = "Classify users and recommend items with cosine k-nearest neighbors", long_about = None)]
struct Args {
    /// CSV file with one row per user and one column per item
    #[arg(short, long, default_value = "dataset_ratings.csv")]
    dataset: PathBuf,

    /// HTTP API port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    http_port: u16,

    /// Neighbors used when a request does not specify k
    #[arg(short = 'k', long, default_value_t = knnrec_storage::DEFAULT_K)]
    default_k: usize,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => args.log_level.as_str(),
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting knnrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", args.dataset);

    let manager = DatasetManager::load(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?
        .with_default_k(args.default_k)
        .context("invalid --default-k")?;
    let manager = Arc::new(manager);

    let matrix = manager.matrix();
    info!(
        "Serving {} users x {} items, default k = {}",
        matrix.n_users(),
        matrix.n_items(),
        manager.default_k()
    );

    let http_port = args.http_port;
    let http_manager = manager.clone();
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        RestApi::run(http_manager, http_port)
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined? {
                Ok(result) => {
                    result.with_context(|| format!("HTTP server on port {} failed", http_port))?;
                    info!("HTTP server stopped");
                }
                Err(_) => anyhow::bail!("HTTP server thread panicked"),
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
