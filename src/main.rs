use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use facescan_backend::notify::WebhookNotifier;
use facescan_backend::store::FaceStore;
use facescan_backend::utils::config::Config;
use facescan_backend::utils::logging;
use facescan_backend::verify::RemoteVerifier;
use facescan_backend::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cfg = Config::from_env();

    let store = FaceStore::open(&cfg.storage_root)?;
    let verifier = RemoteVerifier::new(
        cfg.verify_url.clone(),
        cfg.verify_model.clone(),
        Duration::from_secs(cfg.verify_timeout_secs),
    )?;
    let notifier = WebhookNotifier::new(cfg.webhook_url.clone(), Duration::from_secs(cfg.webhook_timeout_secs))?;
    info!(
        verify_url = %cfg.verify_url,
        model = %cfg.verify_model,
        webhook_url = %cfg.webhook_url,
        policy = ?cfg.match_policy,
        "services configured"
    );

    let state = Arc::new(AppState::new(&cfg, store, Arc::new(verifier), Arc::new(notifier)));
    let app = facescan_backend::api::routes::router(state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", cfg.host, cfg.port))?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening" = %addr);
    axum::serve(listener, app).await?;
    Ok(())
}
