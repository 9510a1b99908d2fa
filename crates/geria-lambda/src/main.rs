use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use geria_lambda::config::{AppConfig, StoreBackend};
use geria_lambda::state::AppState;
use geria_storage::store::{MemoryObjectStore, ObjectStore, S3ObjectStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn ObjectStore> = match config.store {
        StoreBackend::S3 => {
            let client = geria_storage::client::build_client().await;
            Arc::new(S3ObjectStore::new(client, config.bucket.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; documents are lost on exit");
            Arc::new(MemoryObjectStore::new())
        }
    };
    tracing::info!(bucket = %config.bucket, store = ?config.store, "starting");

    let app = geria_lambda::router(AppState::new(store));

    match config.local_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "serving locally");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
    }
}
