use aura_api::config::{ApiConfig, StorageKind};
use aura_api::router;
use aura_api::state::AppState;
use aura_assist::client::Assistant;
use aura_entities::registry::Entities;
use aura_storage::memory::MemoryBackend;
use aura_storage::storage::Storage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let storage = match config.storage {
        StorageKind::S3 => {
            let s3 = aura_storage::client::build_client(&config.region).await;
            Storage::s3(s3, config.bucket.clone())
        }
        StorageKind::Memory => Storage::memory(MemoryBackend::new()),
    };

    let assistant = match &config.model_id {
        Some(model_id) => Some(Assistant::from_env(&config.region, model_id.clone()).await),
        None => {
            tracing::info!("no model configured, using deterministic replies");
            None
        }
    };

    let state = AppState {
        backend: storage.backend_name(),
        entities: Entities::new(storage, config.limits, assistant),
    };
    let app = router(state, config.max_upload_bytes);

    tracing::info!(
        storage = ?config.storage,
        bucket = %config.bucket,
        max_page_size = config.limits.max_page_size,
        "aura api starting"
    );

    match &config.listen_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(addr = %addr, "serving http");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
    }
}
